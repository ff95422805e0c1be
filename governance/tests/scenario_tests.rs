//! End-to-end governance scenarios wired to nullable collaborators.

use std::sync::Arc;

use tally_governance::{
    GovernanceConfig, GovernanceEngine, GovernanceError, ProposalStatus, WithdrawalPolicy,
};
use tally_nullables::{NullClock, NullLedger, NullTarget};
use tally_types::{AccountId, CallPayload, VoteSide};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct World {
    engine: GovernanceEngine,
    ledger: Arc<NullLedger>,
    target: Arc<NullTarget>,
    clock: Arc<NullClock>,
    owner: AccountId,
    second: AccountId,
    third: AccountId,
}

fn world(config_toml: &str) -> World {
    let params = GovernanceConfig::from_toml_str(config_toml)
        .expect("valid config")
        .into_params()
        .expect("valid params");
    let ledger = Arc::new(NullLedger::new());
    let target = Arc::new(NullTarget::new());
    let clock = Arc::new(NullClock::new(1_650_000_000));
    let engine = GovernanceEngine::new(params, ledger.clone(), target.clone(), clock.clone());

    let owner = AccountId::new("owner");
    let second = AccountId::new("second");
    let third = AccountId::new("third");
    for who in [&owner, &second, &third] {
        ledger.mint(who, 10_000);
    }
    World {
        engine,
        ledger,
        target,
        clock,
        owner,
        second,
        third,
    }
}

fn default_world() -> World {
    world(
        r#"
            chairperson = "owner"
            minimum_quorum_percent = 40
            debating_period_secs = 3600
        "#,
    )
}

fn propose(w: &World, description: &str) -> u64 {
    w.engine
        .create_proposal(
            &w.owner,
            CallPayload::from_hex("0x40c10f19").expect("hex"),
            AccountId::new("test_calldata"),
            description,
        )
        .expect("chairperson can propose")
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn deposit_and_withdraw_round_trip() {
    let w = default_world();
    w.ledger.approve(&w.owner, 1_000);

    assert_eq!(w.engine.deposit(&w.owner, 1_000).unwrap(), 1_000);
    assert!(matches!(
        w.engine.withdraw(&w.owner, 1_100),
        Err(GovernanceError::InsufficientVotingPower { .. })
    ));
    assert_eq!(w.engine.withdraw(&w.owner, 100).unwrap(), 900);
    assert_eq!(w.engine.ledger_balance(&w.owner), 9_100);
    assert_eq!(w.ledger.custody(), 900);
}

#[test]
fn deposit_requires_prior_approval() {
    let w = default_world();
    let err = w.engine.deposit(&w.second, 100).unwrap_err();
    assert!(err.to_string().contains("approval required"));
}

#[test]
fn full_lifecycle_approves_and_executes_once() {
    let w = default_world();
    for (who, amount) in [(&w.owner, 1_000), (&w.second, 500), (&w.third, 500)] {
        w.ledger.approve(who, amount);
        w.engine.deposit(who, amount).unwrap();
    }

    assert!(matches!(
        w.engine.create_proposal(
            &w.second,
            CallPayload::default(),
            AccountId::new("test_calldata"),
            "not allowed"
        ),
        Err(GovernanceError::Unauthorized { .. })
    ));
    let id = propose(&w, "mint reward tokens");
    assert_eq!(id, 1);
    assert_eq!(w.engine.proposal(id).unwrap().status, ProposalStatus::Pending);

    w.engine.vote(&w.owner, id, 900, VoteSide::For).unwrap();
    w.engine.vote(&w.second, id, 300, VoteSide::Against).unwrap();
    assert!(matches!(
        w.engine.vote(&w.owner, id, 100, VoteSide::For),
        Err(GovernanceError::AlreadyVoted { .. })
    ));

    assert!(matches!(
        w.engine.end_proposal(&w.third, id),
        Err(GovernanceError::DebatePeriodNotElapsed { .. })
    ));
    w.clock.advance(3600);

    assert_eq!(
        w.engine.end_proposal(&w.third, id).unwrap(),
        ProposalStatus::Approved
    );
    assert!(matches!(
        w.engine.end_proposal(&w.third, id),
        Err(GovernanceError::AlreadyFinalized { .. })
    ));

    let calls = w.target.invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target, AccountId::new("test_calldata"));
    assert_eq!(calls[0].payload.to_string(), "0x40c10f19");
}

#[test]
fn low_turnout_is_rejected() {
    let w = default_world();
    for (who, amount) in [(&w.owner, 100), (&w.second, 900)] {
        w.ledger.approve(who, amount);
        w.engine.deposit(who, amount).unwrap();
    }
    let id = propose(&w, "quiet proposal");
    w.engine.vote(&w.owner, id, 100, VoteSide::For).unwrap();
    w.clock.advance(3600);

    assert_eq!(
        w.engine.end_proposal(&w.owner, id).unwrap(),
        ProposalStatus::Rejected
    );
    assert_eq!(w.target.invocation_count(), 0);
}

#[test]
fn quorum_is_measured_against_deposits_at_finalization() {
    let w = default_world();
    for (who, amount) in [(&w.owner, 400), (&w.second, 600)] {
        w.ledger.approve(who, amount);
        w.engine.deposit(who, amount).unwrap();
    }
    let id = propose(&w, "turnout shifts");
    w.engine.vote(&w.owner, id, 400, VoteSide::For).unwrap();

    // 400 of 1000 meets 40%; a late deposit dilutes it below the bar.
    w.ledger.approve(&w.third, 100);
    w.engine.deposit(&w.third, 100).unwrap();
    w.clock.advance(3600);

    assert_eq!(
        w.engine.end_proposal(&w.owner, id).unwrap(),
        ProposalStatus::Rejected
    );
}

#[test]
fn locked_withdrawals_when_configured() {
    let w = world(
        r#"
            chairperson = "owner"
            debating_period_secs = 60
            withdrawal_policy = "lock_committed"
        "#,
    );
    assert_eq!(
        w.engine.params().withdrawal_policy,
        WithdrawalPolicy::LockCommitted
    );
    w.ledger.approve(&w.second, 1_000);
    w.engine.deposit(&w.second, 1_000).unwrap();
    let id = propose(&w, "lock test");
    w.engine.vote(&w.second, id, 1_000, VoteSide::Against).unwrap();

    assert!(matches!(
        w.engine.withdraw(&w.second, 1),
        Err(GovernanceError::VotingPowerLocked { .. })
    ));
    w.clock.advance(60);
    assert_eq!(w.engine.withdraw(&w.second, 1_000).unwrap(), 0);
}

#[test]
fn proposals_are_listed_in_creation_order() {
    let w = default_world();
    for name in ["first", "second", "third"] {
        propose(&w, name);
    }
    let descriptions: Vec<String> = w
        .engine
        .proposals()
        .into_iter()
        .map(|p| p.description)
        .collect();
    assert_eq!(descriptions, ["first", "second", "third"]);
    assert!(matches!(
        w.engine.proposal(0),
        Err(GovernanceError::ProposalNotFound(0))
    ));
    assert!(matches!(
        w.engine.proposal(4),
        Err(GovernanceError::ProposalNotFound(4))
    ));
}
