use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use vokab::drill::Drill;
use vokab::language::{Direction, WordList, WordPair};
use vokab::runtime::{DrillEvent, EventChannel, Runner};
use vokab::session::{DrillConfig, Phase};
use vokab::stats::{ErrorCountStore, MemoryStore, StatsDb};

// Headless integration using the internal runtime + Drill without a TTY

fn key(c: char) -> DrillEvent {
    DrillEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn enter() -> DrillEvent {
    DrillEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
}

fn send_str(tx: &mpsc::Sender<DrillEvent>, s: &str) {
    for c in s.chars() {
        tx.send(key(c)).unwrap();
    }
}

/// Minimal event loop; returns how many words were drawn by the tick handler.
fn drive(drill: &mut Drill, runner: &mut Runner<EventChannel>, steps: u32) -> u32 {
    let mut advanced = 0;
    for _ in 0..steps {
        match runner.step() {
            DrillEvent::Tick => {
                if drill.on_tick(Instant::now()) {
                    advanced += 1;
                }
            }
            DrillEvent::Resize => {}
            DrillEvent::Key(key) => match key.code {
                KeyCode::Enter => {
                    drill.submit(Instant::now());
                }
                KeyCode::Char(c) => drill.write(c),
                _ => {}
            },
        }
    }
    advanced
}

#[test]
fn headless_correct_answer_auto_advances() {
    let store = MemoryStore::new();
    let config = DrillConfig {
        advance_delay: Duration::from_millis(10),
        ..Default::default()
    };
    let mut drill =
        Drill::new(vec![WordPair::new("chat", "cat")], Box::new(store.clone()), config)
            .with_seed(3);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(EventChannel::new(rx), Duration::from_millis(5));

    send_str(&tx, "CAT ");
    tx.send(enter()).unwrap();

    let advanced = drive(&mut drill, &mut runner, 30);

    assert_eq!(advanced, 1, "correct answer should advance exactly once");
    assert_eq!(drill.phase(), Phase::Idle);
    assert_eq!(drill.input(), "");
    assert_eq!(drill.session.correct, 1);
    assert_eq!(store.snapshot(), None);
}

#[test]
fn headless_wrong_answer_waits_for_enter() {
    let store = MemoryStore::new();
    let mut drill = Drill::new(
        vec![WordPair::new("chat", "cat")],
        Box::new(store.clone()),
        DrillConfig::default(),
    )
    .with_seed(3);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(EventChannel::new(rx), Duration::from_millis(2));

    send_str(&tx, "dog");
    tx.send(enter()).unwrap();
    let advanced = drive(&mut drill, &mut runner, 20);

    assert_eq!(advanced, 0);
    assert_eq!(drill.phase(), Phase::Incorrect);
    assert_eq!(drill.revealed_answer(), Some("cat"));
    assert_eq!(store.snapshot().unwrap().get("chat"), 1);

    tx.send(enter()).unwrap();
    drive(&mut drill, &mut runner, 3);
    assert_eq!(drill.phase(), Phase::Idle);
    assert_eq!(drill.revealed_answer(), None);
}

#[test]
fn headless_counts_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("vokab.db");
    let pairs = vec![WordPair::new("chat", "cat")];

    {
        let store = StatsDb::open(&db_path).unwrap();
        let mut drill =
            Drill::new(pairs.clone(), Box::new(store), DrillConfig::default()).with_seed(1);
        for _ in 0..3 {
            for c in "chien".chars() {
                drill.write(c);
            }
            drill.submit(Instant::now());
            drill.submit(Instant::now());
        }
    }

    let store = StatsDb::open(&db_path).unwrap();
    assert_eq!(store.load().unwrap().unwrap().get("chat"), 3);

    let drill = Drill::new(pairs, Box::new(store), DrillConfig::default());
    assert_eq!(drill.counts().get("chat"), 3);
    assert_eq!(drill.struggles(10), vec![(WordPair::new("chat", "cat"), 3)]);
}

#[test]
fn headless_builtin_list_reverse_direction() {
    let list = WordList::builtin("french_english").unwrap();
    let store = MemoryStore::new();
    let config = DrillConfig {
        direction: Direction::TargetToSource,
        ..Default::default()
    };
    let mut drill = Drill::new(list.pairs, Box::new(store.clone()), config).with_seed(11);

    let pair = drill.current().cloned().unwrap();
    assert_eq!(drill.prompt(), Some(pair.target.as_str()));

    for c in pair.source.chars() {
        drill.write(c);
    }
    let verdict = drill.submit(Instant::now()).unwrap();
    assert!(verdict.correct);
    assert_eq!(store.snapshot(), None);
}
