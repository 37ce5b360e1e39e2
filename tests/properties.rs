//! Property tests for session invariants.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mask_forge::game::cache::CacheStore;
use mask_forge::game::material::generate;
use mask_forge::{
    DrawSource, GameError, GameSession, HandState, MaskPosition, Token, CATALOG_SIZE,
    MAX_CACHE_CAPACITY, MIN_CACHE_CAPACITY,
};

/// Draw source backed by `rand`, to show any RNG can drive the pile.
struct RandSource(StdRng);

impl DrawSource for RandSource {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

#[derive(Clone, Debug)]
enum Op {
    Draw,
    Place(usize),
    Cache,
    Discard,
    Retrieve(usize),
    Lift(usize),
    Submit,
    SetCacheSize(usize),
    Reset,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Draw),
        6 => (0usize..9).prop_map(Op::Place),
        3 => Just(Op::Cache),
        3 => Just(Op::Discard),
        2 => (0usize..10).prop_map(Op::Retrieve),
        1 => (0usize..9).prop_map(Op::Lift),
        1 => Just(Op::Submit),
        1 => (0usize..15).prop_map(Op::SetCacheSize),
        1 => Just(Op::Reset),
    ]
}

/// Apply an op; `Err` means the session refused it.
fn apply<R: DrawSource>(session: &mut GameSession<R>, op: &Op) -> Result<(), GameError> {
    let position = |i: usize| MaskPosition::from_index(i).unwrap_or(MaskPosition::Nose);
    match op {
        Op::Draw => session.draw().map(|_| ()),
        Op::Place(i) => session.place(position(*i)).map(|_| ()),
        Op::Cache => session.cache_current().map(|_| ()),
        Op::Discard => session.discard().map(|_| ()),
        Op::Retrieve(i) => {
            let cached = session.cache_contents();
            // Out-of-range slots fall back to the first catalog token
            let token = cached.get(*i).copied().unwrap_or_else(|| generate()[0]);
            session.retrieve(token)
        }
        Op::Lift(i) => session.lift(position(*i)).map(|_| ()),
        Op::Submit => session.submit(),
        Op::SetCacheSize(n) => {
            session.set_cache_size(*n);
            Ok(())
        }
        Op::Reset => {
            session.reset();
            Ok(())
        }
    }
}

fn visible_tokens<R: DrawSource>(session: &GameSession<R>) -> Vec<Token> {
    let mut tokens = Vec::new();
    tokens.extend(session.in_hand());
    tokens.extend(session.cache_contents());
    tokens.extend(session.board().placed().map(|(_, t)| t));
    tokens.extend(session.discarded().iter().copied());
    tokens
}

fn check_invariants<R: DrawSource>(session: &GameSession<R>) -> Result<(), TestCaseError> {
    prop_assert_eq!(session.accounted_count(), CATALOG_SIZE);

    let visible = visible_tokens(session);
    let unique: BTreeSet<_> = visible.iter().copied().collect();
    prop_assert_eq!(unique.len(), visible.len(), "token in two places");

    prop_assert!(session.cache_contents().len() <= session.cache_capacity());
    prop_assert!((MIN_CACHE_CAPACITY..=MAX_CACHE_CAPACITY).contains(&session.cache_capacity()));

    let occupied = session.board_snapshot().values().filter(|t| t.is_some()).count();
    prop_assert_eq!(occupied, session.board().occupied_count());
    prop_assert_eq!(session.is_complete(), occupied == 9);
    Ok(())
}

proptest! {
    #[test]
    fn prop_tokens_are_conserved(seed in any::<u64>(), ops in prop::collection::vec(arb_op(), 0..200)) {
        let mut session = GameSession::seeded(seed);
        session.start_game();
        check_invariants(&session)?;

        for op in &ops {
            let before = session.compute_hash();
            let result = apply(&mut session, op);
            if result.is_err() {
                prop_assert_eq!(before, session.compute_hash(), "refused {:?} mutated state", op);
            }
            check_invariants(&session)?;
        }
    }

    #[test]
    fn prop_empty_hand_moves_fail(seed in any::<u64>()) {
        let mut session = GameSession::seeded(seed);
        session.start_game();
        while session.in_hand().is_some() {
            session.discard().unwrap();
        }

        let before = session.compute_hash();
        prop_assert_eq!(session.place(MaskPosition::Mouth), Err(GameError::NoCurrentToken));
        prop_assert_eq!(session.cache_current(), Err(GameError::NoCurrentToken));
        prop_assert_eq!(session.discard(), Err(GameError::NoCurrentToken));
        prop_assert_eq!(session.compute_hash(), before);
    }

    #[test]
    fn prop_cache_shrink_evicts_tail(size in 0usize..=10, requested in 0usize..20) {
        let tokens = generate();
        let mut cache = CacheStore::new(10);
        for token in &tokens[..size] {
            prop_assert!(cache.add(*token));
        }

        let evicted = cache.set_capacity(requested);
        let capacity = requested.clamp(MIN_CACHE_CAPACITY, MAX_CACHE_CAPACITY);
        prop_assert_eq!(cache.capacity(), capacity);
        prop_assert_eq!(evicted.len(), size.saturating_sub(capacity));
        prop_assert_eq!(cache.len(), size.min(capacity));
        prop_assert_eq!(cache.contents(), tokens[..size.min(capacity)].to_vec());
    }

    #[test]
    fn prop_same_seed_same_hash(seed in any::<u64>(), ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut a = GameSession::seeded(seed);
        let mut b = GameSession::seeded(seed);
        a.start_game();
        b.start_game();

        for op in &ops {
            prop_assert_eq!(apply(&mut a, op), apply(&mut b, op));
        }
        prop_assert_eq!(a.compute_hash(), b.compute_hash());
    }
}

#[test]
fn rand_driven_sessions_never_repeat_a_draw() {
    let mut seeds = StdRng::seed_from_u64(2024);

    for _ in 0..20 {
        let source = RandSource(StdRng::seed_from_u64(seeds.gen()));
        let mut session = GameSession::with_source(source, 0, 5);
        session.start_game();

        let mut seen = BTreeSet::new();
        while let HandState::Holding(token) = session.hand_state() {
            assert!(seen.insert(token), "{} drawn twice", token);
            if session.cache_current().is_err() {
                session.discard().unwrap();
            }
        }
        assert_eq!(seen.len(), CATALOG_SIZE);
        assert_eq!(session.accounted_count(), CATALOG_SIZE);
    }
}

#[test]
fn fill_submit_then_lift_fails_submit() {
    let mut session = GameSession::seeded(31);
    session.start_game();

    for position in MaskPosition::ALL {
        session.place(position).unwrap();
    }
    assert_eq!(session.submit(), Ok(()));

    while session.in_hand().is_some() {
        session.discard().unwrap();
    }
    session.lift(MaskPosition::RightEar).unwrap();
    assert_eq!(session.submit(), Err(GameError::MaskIncomplete));
}

#[test]
fn cache_size_bounds_are_clamped() {
    let mut session = GameSession::seeded(5);
    session.start_game();

    session.set_cache_size(2);
    assert_eq!(session.cache_capacity(), 3);
    session.set_cache_size(15);
    assert_eq!(session.cache_capacity(), 10);
}
