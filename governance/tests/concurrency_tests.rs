//! Concurrent callers against one engine: no lost updates, exactly one execution.

use std::sync::Arc;
use std::thread;

use tally_governance::{GovernanceEngine, GovernanceError, GovernanceParams, ProposalStatus};
use tally_nullables::{NullClock, NullLedger, NullTarget};
use tally_types::{AccountId, CallPayload, VoteSide};

fn setup(voters: usize, each: u128) -> (GovernanceEngine, Arc<NullTarget>, Arc<NullClock>) {
    let ledger = Arc::new(NullLedger::new());
    let target = Arc::new(NullTarget::new());
    let clock = Arc::new(NullClock::new(0));
    let engine = GovernanceEngine::new(
        GovernanceParams::new(AccountId::new("chair"), 40, 100).unwrap(),
        ledger.clone(),
        target.clone(),
        clock.clone(),
    );
    for i in 0..voters {
        let who = AccountId::new(format!("voter_{i}"));
        ledger.mint(&who, each);
        ledger.approve(&who, each);
        engine.deposit(&who, each).unwrap();
    }
    (engine, target, clock)
}

#[test]
fn concurrent_votes_are_all_tallied() {
    let (engine, _, _) = setup(32, 10);
    let id = engine
        .create_proposal(
            &AccountId::new("chair"),
            CallPayload::default(),
            AccountId::new("target"),
            "",
        )
        .unwrap();

    thread::scope(|s| {
        for i in 0..32 {
            let engine = &engine;
            s.spawn(move || {
                let side = VoteSide::from(i % 4 != 0);
                engine
                    .vote(&AccountId::new(format!("voter_{i}")), id, 10, side)
                    .unwrap();
            });
        }
    });

    let proposal = engine.proposal(id).unwrap();
    assert_eq!(proposal.for_votes, 24 * 10);
    assert_eq!(proposal.against_votes, 8 * 10);
}

#[test]
fn racing_duplicate_votes_count_once() {
    let (engine, _, _) = setup(1, 50);
    let id = engine
        .create_proposal(
            &AccountId::new("chair"),
            CallPayload::default(),
            AccountId::new("target"),
            "",
        )
        .unwrap();
    let voter = AccountId::new("voter_0");

    let successes: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = &engine;
                let voter = &voter;
                s.spawn(move || engine.vote(voter, id, 50, VoteSide::For).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum()
    });

    assert_eq!(successes, 1);
    assert_eq!(engine.proposal(id).unwrap().for_votes, 50);
}

#[test]
fn racing_finalizers_execute_once() {
    let (engine, target, clock) = setup(2, 500);
    let id = engine
        .create_proposal(
            &AccountId::new("chair"),
            CallPayload::new(vec![1]),
            AccountId::new("target"),
            "",
        )
        .unwrap();
    engine
        .vote(&AccountId::new("voter_0"), id, 500, VoteSide::For)
        .unwrap();
    clock.advance(100);

    let results: Vec<Result<ProposalStatus, GovernanceError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let engine = &engine;
                s.spawn(move || engine.end_proposal(&AccountId::new(format!("caller_{i}")), id))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let approved = results
        .iter()
        .filter(|r| matches!(r, Ok(ProposalStatus::Approved)))
        .count();
    let rejected_as_final = results
        .iter()
        .filter(|r| matches!(r, Err(GovernanceError::AlreadyFinalized { .. })))
        .count();
    assert_eq!(approved, 1);
    assert_eq!(rejected_as_final, 15);
    assert_eq!(target.invocation_count(), 1);
}

#[test]
fn concurrent_deposits_and_withdrawals_balance_out() {
    let (engine, _, _) = setup(8, 1_000);

    thread::scope(|s| {
        for i in 0..8 {
            let engine = &engine;
            s.spawn(move || {
                let who = AccountId::new(format!("voter_{i}"));
                for _ in 0..10 {
                    engine.withdraw(&who, 100).unwrap();
                }
            });
        }
    });

    assert_eq!(engine.total_deposited(), 0);
    for i in 0..8 {
        let who = AccountId::new(format!("voter_{i}"));
        assert_eq!(engine.voting_power(&who), 0);
        assert_eq!(engine.ledger_balance(&who), 1_000);
    }
}
