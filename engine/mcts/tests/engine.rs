//! Whole-engine tests on Ultimate Tic-Tac-Toe positions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use engine_core::{GameState, Outcome, Side};
use games_uttt::{Cell, State};
use mcts::{Engine, Node, Searcher, SearchConfig, Simulator, WorkerPool};

/// Small-board word with our marks in `us` cells, opponent marks in `opp`.
fn word(us: &[u32], opp: &[u32]) -> u32 {
    let mut w = 0;
    for &c in us {
        w |= 2 << (2 * c);
    }
    for &c in opp {
        w |= 1 << (2 * c);
    }
    w
}

#[test]
fn finds_the_immediate_win() {
    // We already own boards 0 and 1; the opponent just forced us into board
    // 2, where we hold two of the top row. Completing it wins the game.
    let mut boards = [0u32; 9];
    boards[0] = word(&[0, 1, 2], &[3, 7]);
    boards[1] = word(&[0, 1, 2], &[4, 8]);
    boards[2] = word(&[0, 1], &[3, 4]);
    boards[5] = word(&[], &[2, 6]);
    let position = State::from_boards(boards, Side::Us, Some(5 * 9 + 2));
    assert_eq!(position.status(), Outcome::NotFinished);

    let config = SearchConfig::for_testing()
        .with_first_move_budget(Duration::from_millis(50))
        .with_seed(42);
    let engine = Engine::new(position, config).expect("engine builds");

    assert_eq!(engine.ai_move(), Some(2 * 9 + 2));
    assert_eq!(engine.current_state().status(), Outcome::Hit);
}

#[test]
fn opening_reply_obeys_the_forced_board() {
    // The opponent opened in the centre of the centre small board, so the
    // reply must land in the small board at super-coordinates (1, 1).
    let engine = Engine::new(
        State::with_opening(Cell::new(4, 4)),
        SearchConfig::for_testing().with_seed(1),
    )
    .expect("engine builds");

    let reply = engine.ai_move().expect("a reply was chosen");
    assert_eq!(reply / 9, 4);
    let cell = Cell::from_move(reply);
    assert_eq!((cell.row / 3, cell.col / 3), (1, 1));
}

#[test]
fn self_play_reaches_a_verdict() {
    let config = SearchConfig::for_testing()
        .with_first_move_budget(Duration::from_millis(25))
        .with_move_budget(Duration::from_millis(10));

    // Engine A opens; engine B sees that opening from the other side.
    let mut referee = State::new();
    let mut a = Engine::new(State::new(), config.clone().with_seed(11)).expect("engine builds");
    let first = a.ai_move().expect("opening chosen");
    assert!(referee.legal_moves().contains(&first));
    referee.apply(first);

    let mut b = Engine::new(
        State::with_opening(Cell::from_move(first)),
        config.with_seed(22),
    )
    .expect("engine builds");

    let mut plies = 1;
    let play = |engine: &mut Engine<State>, referee: &mut State, plies: &mut u32| {
        let mv = engine.ai_move().expect("a move was chosen");
        assert!(
            referee.legal_moves().contains(&mv),
            "illegal move {mv} at ply {plies}"
        );
        referee.apply(mv);
        *plies += 1;
        mv
    };

    loop {
        let mv = play(&mut b, &mut referee, &mut plies);
        if referee.status().is_settled() {
            break;
        }
        a.opponent_move(mv).expect("legal move accepted");

        let mv = play(&mut a, &mut referee, &mut plies);
        if referee.status().is_settled() {
            break;
        }
        b.opponent_move(mv).expect("legal move accepted");
    }

    assert!(plies <= 81, "game overran the board");
    assert!(matches!(
        referee.status(),
        Outcome::Hit | Outcome::Miss | Outcome::Draw
    ));
}

#[test]
fn counters_stay_monotonic_and_consistent() {
    let root = Node::new_root(State::with_opening(Cell::new(0, 0)));
    let pool = Arc::new(WorkerPool::new(2));
    let mut searcher =
        Searcher::with_simulator(Simulator::with_pool(pool, 4, 9), 9, std::f64::consts::SQRT_2);

    let mut previous: HashMap<usize, (u32, u32, u32)> = HashMap::new();
    for _ in 0..60 {
        searcher.choose_child(&root).expect("pool is live");

        // Counters never decrease anywhere in the tree.
        let mut snapshot = HashMap::new();
        collect(&root, &mut snapshot);
        for (id, now) in &snapshot {
            if let Some(before) = previous.get(id) {
                assert!(now.0 >= before.0 && now.1 >= before.1 && now.2 >= before.2);
            }
        }
        previous = snapshot;

        check_consistency(&root);
    }
    assert_eq!(root.total_trials(), 60 * 4);
}

/// Counter snapshot keyed by node identity, so nodes added by later
/// expansions do not shift earlier entries.
fn collect(node: &Arc<Node<State>>, out: &mut HashMap<usize, (u32, u32, u32)>) {
    out.insert(
        Arc::as_ptr(node) as usize,
        (node.hits(), node.misses(), node.total_trials()),
    );
    if let Some(children) = node.children() {
        for child in children {
            collect(child, out);
        }
    }
}

/// Every internal node has at least as many trials as its children combined,
/// and hits/misses never exceed trials.
fn check_consistency(node: &Arc<Node<State>>) {
    assert!(node.hits() + node.misses() <= node.total_trials());
    if let Some(children) = node.children() {
        let from_children: u32 = children.iter().map(|c| c.total_trials()).sum();
        assert!(
            node.total_trials() >= from_children,
            "parent saw fewer trials than its children"
        );
        for child in children {
            check_consistency(child);
        }
    }
}
