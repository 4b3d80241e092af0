//! Engine-level QA scenarios. Each one drives the public planner API the way
//! the web client would, then checks the invariants that matter.

use std::collections::HashSet;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail, ensure};
use colored::Colorize;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use vagabond_trip::{
    ActivityDraft, ActivityField, DRAFT_KEY, DraftVault, EntityId, GenerateOutcome, MemoryBackend,
    PlanError, RESULT_KEY, SyncBridge, TRIP_COST, TransactionKind, TravelPreferences, VAULT_KEY,
    WELCOME_CREDITS,
};

use crate::harness::{TesterEngine, canned_trip, planner, sign_in, trip_prefs};

pub const SCENARIOS: [(&str, &str); 6] = [
    (
        "smoke",
        "Full happy-path session: restore, generate, edit, save locally and remotely",
    ),
    (
        "edit-storm",
        "Random structural edits with well-formedness checks after every step",
    ),
    (
        "credit-ledger",
        "Balance runs dry, a purchase refills it, and the ledger reconciles",
    ),
    (
        "concurrent-debits",
        "Simultaneous debits cannot both pass the balance check",
    ),
    (
        "draft-recovery",
        "Corrupt local storage is absorbed and overwritten cleanly",
    ),
    (
        "stale-response",
        "A superseded generation response is discarded unapplied",
    ),
];

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub passed: bool,
    pub duration_ms: u64,
    pub failures: Vec<String>,
}

/// Run one scenario `iterations` times, bumping the seed each round so the
/// rounds are distinct but reproducible.
pub async fn run_batch(name: &str, seed: u64, iterations: usize, verbose: bool) -> ScenarioResult {
    let start = Instant::now();
    let mut failures = Vec::new();
    let mut successful = 0usize;

    for iteration in 0..iterations {
        let iteration_seed = seed.wrapping_add(iteration as u64);
        if verbose {
            println!("  {} {name} (seed {iteration_seed})", "▶".cyan());
        }
        match run_scenario(name, iteration_seed).await {
            Ok(()) => successful += 1,
            Err(err) => failures.push(format!("seed {iteration_seed}: {err:#}")),
        }
    }

    ScenarioResult {
        scenario_name: name.to_string(),
        seed,
        iterations_run: iterations,
        successful_iterations: successful,
        passed: successful == iterations,
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        failures,
    }
}

pub async fn run_scenario(name: &str, seed: u64) -> Result<()> {
    log::debug!("running scenario {name} with seed {seed}");
    match name {
        "smoke" => run_smoke(seed).await,
        "edit-storm" => run_edit_storm(seed).await,
        "credit-ledger" => run_credit_ledger(seed).await,
        "concurrent-debits" => run_concurrent_debits().await,
        "draft-recovery" => run_draft_recovery(seed),
        "stale-response" => run_stale_response(seed).await,
        other => bail!("unknown scenario '{other}'"),
    }
}

async fn run_smoke(seed: u64) -> Result<()> {
    let (mut engine, store) = planner(seed);
    engine.restore();
    engine.update_prefs(|p| *p = trip_prefs());
    sign_in(&mut engine, "smoke@example.com");

    let outcome = engine.generate_trip().await?;
    ensure!(
        matches!(outcome, GenerateOutcome::Planned { balance } if balance == WELCOME_CREDITS - TRIP_COST),
        "unexpected generation outcome: {outcome:?}"
    );

    let renamed = engine
        .session()
        .itinerary()
        .and_then(|t| t.days.first())
        .and_then(|d| d.activities.first())
        .map(|a| a.id.clone())
        .ok_or_else(|| anyhow!("generated trip has no activities"))?;
    engine.update_activity_field(0, &renamed, ActivityField::Name, "Renamed stop")?;

    // Accepting the same packing suggestions twice adds each item once.
    let suggestions = engine.suggest_packing().await?;
    ensure!(!suggestions.is_empty(), "expected packing suggestions");
    for suggestion in &suggestions {
        engine.merge_suggested_packing_item(suggestion);
    }
    for suggestion in &suggestions {
        engine.merge_suggested_packing_item(suggestion);
    }
    ensure!(
        packing_items(&engine) == suggestions.len(),
        "packing merge should be idempotent"
    );

    ensure!(engine.save_active_to_vault()?, "first vault save adds");
    ensure!(!engine.save_active_to_vault()?, "second vault save skips");

    let record = engine
        .save_to_account()
        .await?
        .ok_or_else(|| anyhow!("an itinerary is active"))?;
    let listed = engine.account_trips().await?;
    ensure!(
        listed.first().map(|r| r.id.as_str()) == Some(record.id.as_str()),
        "saved record should list first"
    );

    let mirrored = DraftVault::new(store).load_result();
    ensure!(
        mirrored.as_ref() == engine.session().itinerary(),
        "local mirror drifted from the session"
    );
    Ok(())
}

fn packing_items(engine: &TesterEngine) -> usize {
    engine
        .session()
        .itinerary()
        .map_or(0, |t| t.packing_list.iter().map(|c| c.items.len()).sum())
}

async fn run_edit_storm(seed: u64) -> Result<()> {
    let (mut engine, store) = planner(seed);
    engine.set_prefs(trip_prefs());
    sign_in(&mut engine, "storm@example.com");
    let outcome = engine.generate_trip().await?;
    ensure!(
        matches!(outcome, GenerateOutcome::Planned { .. }),
        "generation should succeed"
    );

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    for step in 0..120 {
        let op = rng.gen_range(0u8..6);
        apply_random_edit(&mut engine, &mut rng, op)
            .with_context(|| format!("storm step {step}, op {op}"))?;
        check_well_formed(&engine)?;
    }

    let mirrored = DraftVault::new(store).load_result();
    ensure!(
        mirrored.as_ref() == engine.session().itinerary(),
        "local mirror drifted during the storm"
    );
    Ok(())
}

fn apply_random_edit(engine: &mut TesterEngine, rng: &mut ChaCha20Rng, op: u8) -> Result<()> {
    const FIELDS: [ActivityField; 6] = [
        ActivityField::Time,
        ActivityField::Name,
        ActivityField::Location,
        ActivityField::Description,
        ActivityField::Emoji,
        ActivityField::Cost,
    ];

    let day_len = engine
        .session()
        .itinerary()
        .map(|t| t.days.len())
        .ok_or_else(|| anyhow!("no active trip"))?;

    match op {
        0 => {
            let mut order: Vec<EntityId> = engine
                .session()
                .itinerary()
                .map(|t| t.days.iter().map(|d| d.id.clone()).collect())
                .unwrap_or_default();
            order.shuffle(rng);
            engine.reorder_days(&order)?;
        }
        1 => {
            let day_index = rng.gen_range(0..day_len);
            let mut order: Vec<EntityId> = engine
                .session()
                .itinerary()
                .map(|t| t.days[day_index].activities.iter().map(|a| a.id.clone()).collect())
                .unwrap_or_default();
            order.shuffle(rng);
            engine.reorder_activities(day_index, &order)?;
        }
        2 => {
            let pick = first_activity(engine);
            if let Some((from, id)) = pick {
                let to_number = rng.gen_range(1..=day_len as u32);
                engine.move_activity(from, &id, to_number)?;
            }
        }
        3 => {
            let pick = first_activity(engine);
            if let Some((day_index, id)) = pick {
                let field = FIELDS[rng.gen_range(0..FIELDS.len())];
                engine.update_activity_field(day_index, &id, field, "edited")?;
            }
        }
        4 => {
            let day_index = rng.gen_range(0..day_len);
            let _ = engine.add_activity(day_index, ActivityDraft::default())?;
        }
        _ => {
            let pick = first_activity(engine);
            if let Some((day_index, id)) = pick {
                engine.delete_activity(day_index, &id)?;
            }
        }
    }
    Ok(())
}

fn first_activity(engine: &TesterEngine) -> Option<(usize, EntityId)> {
    engine.session().itinerary().and_then(|t| {
        t.days
            .iter()
            .enumerate()
            .find(|(_, d)| !d.activities.is_empty())
            .map(|(i, d)| (i, d.activities[0].id.clone()))
    })
}

fn check_well_formed(engine: &TesterEngine) -> Result<()> {
    let Some(plan) = engine.session().itinerary() else {
        bail!("trip disappeared mid-storm");
    };
    let mut ids = HashSet::new();
    for (index, day) in plan.days.iter().enumerate() {
        ensure!(
            day.day == index as u32 + 1,
            "day numbering broke: day {} at index {index}",
            day.day
        );
        ensure!(ids.insert(day.id.clone()), "duplicate day id {}", day.id);
        for activity in &day.activities {
            ensure!(
                ids.insert(activity.id.clone()),
                "duplicate activity id {}",
                activity.id
            );
        }
    }
    Ok(())
}

async fn run_credit_ledger(seed: u64) -> Result<()> {
    let (mut engine, _) = planner(seed);
    engine.set_prefs(trip_prefs());
    let user_id = sign_in(&mut engine, "ledger@example.com");

    let mut generated = 0usize;
    while engine.session().balance() >= TRIP_COST {
        let _ = engine.generate_trip().await?;
        generated += 1;
    }
    ensure!(
        generated == (WELCOME_CREDITS / TRIP_COST) as usize,
        "welcome credits should cover exactly {} trips, got {generated}",
        WELCOME_CREDITS / TRIP_COST
    );

    match engine.generate_trip().await {
        Err(PlanError::InsufficientBalance { balance: 0, .. }) => {}
        other => bail!("expected an insufficient balance, got {other:?}"),
    }

    let balance = engine.purchase_credits(25).await?;
    ensure!(balance == 25, "purchase should land on the drained balance");
    let _ = engine.generate_trip().await?;
    ensure!(engine.session().balance() == 25 - TRIP_COST);

    // The ledger always sums to the stored balance.
    let profile = engine
        .remote()
        .profile(&user_id)
        .await?
        .ok_or_else(|| anyhow!("profile vanished"))?;
    let ledger = engine.remote().backend().transactions_for_user(&user_id);
    let ledger_sum: i64 = ledger.iter().map(|t| t.amount).sum();
    ensure!(
        ledger_sum == i64::from(profile.credits),
        "ledger sums to {ledger_sum} but the balance is {}",
        profile.credits
    );
    ensure!(
        ledger
            .iter()
            .filter(|t| t.kind == TransactionKind::TripGeneration)
            .count()
            == generated + 1
    );
    Ok(())
}

async fn run_concurrent_debits() -> Result<()> {
    for _ in 0..10 {
        let backend = MemoryBackend::new();
        let profile = backend.create_profile("race@example.com", None);
        let bridge = SyncBridge::new(backend);

        let (a, b) = tokio::join!(
            bridge.debit_credits(&profile.id, 7),
            bridge.debit_credits(&profile.id, 7)
        );
        let (a, b) = (a?, b?);
        ensure!(
            a.is_debited() ^ b.is_debited(),
            "exactly one concurrent debit may pass: {a:?} vs {b:?}"
        );

        let remaining = bridge
            .profile(&profile.id)
            .await?
            .map_or(0, |p| p.credits);
        ensure!(remaining == WELCOME_CREDITS - 7, "balance should be debited once");
        ensure!(
            bridge.backend().transactions_for_user(&profile.id).len() == 2,
            "only the welcome grant and the winning debit are recorded"
        );
    }
    Ok(())
}

fn run_draft_recovery(seed: u64) -> Result<()> {
    let (mut engine, store) = planner(seed);
    store.put(DRAFT_KEY, "{\"days\": \"many\"");
    store.put(RESULT_KEY, "undefined");
    store.put(VAULT_KEY, "[{\"broken\": true]");

    engine.restore();
    ensure!(
        engine.session().prefs() == &TravelPreferences::default(),
        "corrupt draft should read as defaults"
    );
    ensure!(
        engine.session().itinerary().is_none(),
        "corrupt result should read as empty"
    );
    ensure!(
        engine.saved_trips().is_empty(),
        "corrupt vault should read as empty"
    );

    // Writing a fresh draft replaces the garbage.
    engine.set_prefs(trip_prefs());
    let reread = DraftVault::new(store).load_draft();
    ensure!(reread == trip_prefs(), "fresh draft should round-trip");
    Ok(())
}

async fn run_stale_response(seed: u64) -> Result<()> {
    let (mut engine, _) = planner(seed);
    engine.set_prefs(trip_prefs());
    sign_in(&mut engine, "stale@example.com");

    let first = engine.begin_trip_request()?;
    let second = engine.begin_trip_request()?;

    ensure!(
        !engine.install_trip(&first, canned_trip(seed))?,
        "the superseded response must be discarded"
    );
    ensure!(engine.session().itinerary().is_none());
    ensure!(
        engine.install_trip(&second, canned_trip(seed))?,
        "the current response must install"
    );
    ensure!(engine.session().itinerary().is_some());
    Ok(())
}
