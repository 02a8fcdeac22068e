use std::collections::BTreeSet;
use std::sync::Arc;

use givechain_core::form::DonationForm;
use givechain_core::{
    CharityDraft, Config, DonationDraft, Fixtures, Operation, SimulatedChain, Store, StoreError,
    ANONYMOUS,
};

fn store(chain: SimulatedChain) -> Store {
    Store::new(Arc::new(Fixtures::embedded().unwrap()), Arc::new(chain))
}

fn draft(amount: u64, donor_name: Option<&str>) -> DonationDraft {
    DonationDraft {
        charity_id: "charity-1".into(),
        charity_name: "Doctors Without Borders".into(),
        amount,
        donor_address: "ST1ALICE".into(),
        donor_name: donor_name.map(str::to_string),
        message: Some("go team".into()),
        transaction_id: "tx-1".into(),
    }
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn donation_scenario_lands_in_both_lists() {
    let store = store(SimulatedChain::default());
    let donation = store
        .make_donation(draft(50, Some("Alice")))
        .await
        .unwrap();

    assert_eq!(donation.amount, 50);
    assert_eq!(donation.donor_name.as_deref(), Some("Alice"));
    assert_eq!(donation.message.as_deref(), Some("go team"));
    let rendered = donation.timestamp.to_rfc3339();
    assert!(chrono::DateTime::parse_from_rfc3339(&rendered).is_ok());

    let state = store.ledger.snapshot();
    assert!(state.donations.contains(&donation));
    assert!(state.user_donations.contains(&donation));
    assert_eq!(state.status.error, None);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn anonymous_form_records_marker() {
    let store = store(SimulatedChain::default());
    store.fetch_charities().await.unwrap();
    let charity = store.registry.find("charity-3").unwrap();

    let form = DonationForm {
        amount: 10,
        donor_name: String::new(),
        anonymous: true,
        message: String::new(),
    };
    let donation = store
        .make_donation(form.into_draft(&charity, "").unwrap())
        .await
        .unwrap();
    assert_eq!(donation.donor_name.as_deref(), Some(ANONYMOUS));
    assert_eq!(donation.charity_name, "Feeding America");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn ids_stay_unique_across_many_submissions() {
    let store = store(SimulatedChain::instant());
    let mut ids = BTreeSet::new();
    for amount in 1..=50 {
        let donation = store.make_donation(draft(amount, None)).await.unwrap();
        assert_eq!(donation.amount, amount);
        assert!(ids.insert(donation.id));
    }
    assert_eq!(store.ledger.donations().len(), 50);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn user_fetch_returns_exact_subset() {
    let store = store(SimulatedChain::default());
    store.fetch_donations().await.unwrap();
    let address = "st2cy5v39nhdpwsxmw9qdt3hc3gd6q6xx4cfrk9ag";
    store.fetch_user_donations(address).await.unwrap();

    let state = store.ledger.snapshot();
    let expected: Vec<_> = state
        .donations
        .iter()
        .filter(|d| d.donor_address.eq_ignore_ascii_case(address))
        .cloned()
        .collect();
    assert_eq!(expected.len(), 2);
    assert_eq!(state.user_donations, expected);

    store.fetch_user_donations("ST1ABC").await.unwrap();
    assert!(store.ledger.user_donations().is_empty());
    assert_eq!(store.ledger.error(), None);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn forced_donation_failure_changes_nothing() {
    let store = store(SimulatedChain::default().fail(Operation::MakeDonation));
    store.fetch_charities().await.unwrap();
    store.fetch_donations().await.unwrap();
    let ledger_before = store.ledger.snapshot();
    let charity_before = store.registry.find("charity-1").unwrap();

    let err = store.make_donation(draft(50, Some("Alice"))).await.unwrap_err();
    assert_eq!(err, StoreError::ProcessDonation);

    let ledger_after = store.ledger.snapshot();
    assert_eq!(ledger_after.donations, ledger_before.donations);
    assert_eq!(ledger_after.user_donations, ledger_before.user_donations);
    assert_eq!(ledger_after.status.error, Some(StoreError::ProcessDonation));
    assert!(!ledger_after.status.is_loading);
    assert_eq!(store.registry.find("charity-1").unwrap(), charity_before);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn donations_credit_charity_counters() {
    let store = store(SimulatedChain::instant());
    store.fetch_charities().await.unwrap();
    store.fetch_donations().await.unwrap();
    let before = store.registry.find("charity-1").unwrap();

    // The fixture already holds a donation from this address to charity-1.
    let mut returning = draft(40, None);
    returning.donor_address = "st1pqhqkv0rjxzfy1dgx8mnsnyve3vgzjsrtpgzgm".into();
    store.make_donation(returning).await.unwrap();

    store.make_donation(draft(60, None)).await.unwrap();
    store.make_donation(draft(5, None)).await.unwrap();

    let after = store.registry.find("charity-1").unwrap();
    assert_eq!(after.total_donations, before.total_donations + 105);
    assert_eq!(after.donor_count, before.donor_count + 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn simultaneous_donations_from_one_new_donor_count_once() {
    let store = store(SimulatedChain::default());
    store.fetch_charities().await.unwrap();
    store.fetch_donations().await.unwrap();
    let before = store.registry.find("charity-1").unwrap();

    let mut first = draft(30, None);
    first.donor_address = "ST9NEWDONOR".into();
    let mut second = first.clone();
    second.amount = 70;
    let (a, b) = tokio::join!(store.make_donation(first), store.make_donation(second));
    a.unwrap();
    b.unwrap();

    let after = store.registry.find("charity-1").unwrap();
    assert_eq!(after.total_donations, before.total_donations + 100);
    assert_eq!(after.donor_count, before.donor_count + 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn registration_ignores_draft_review_state() {
    let store = store(SimulatedChain::default());
    let charity = store
        .register_charity(CharityDraft {
            name: "Night Shelter".into(),
            description: "Beds for the night.".into(),
            mission: "Nobody sleeps outside.".into(),
            category: "Housing".into(),
            image_url: String::new(),
            website: "https://shelter.example".into(),
            wallet_address: "ST7SHELTER".into(),
            social_links: None,
        })
        .await
        .unwrap();
    assert!(!charity.verified);
    assert!(!charity.featured);
    assert_eq!((charity.total_donations, charity.donor_count), (0, 0));
    assert_eq!(store.registry.charities(), vec![charity]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn store_from_config_honours_faults() {
    let config = Config::from_slice(
        br#"{ "latency": { "fetch_featured_charities_ms": 5 }, "faults": { "fail": ["fetch_featured_charities"] } }"#,
    )
    .unwrap();
    let store = Store::from_config(&config).unwrap();
    assert_eq!(
        store.fetch_featured_charities().await,
        Err(StoreError::FetchFeaturedCharities)
    );
    assert!(store.registry.featured_charities().is_empty());
    store.fetch_charities().await.unwrap();
    assert_eq!(store.registry.charities().len(), 8);
}
