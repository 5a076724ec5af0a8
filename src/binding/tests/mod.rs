//! Unit tests for the binding context.

use crate::binding::services::{BindingManager, ProfileResolver};
use crate::catalog::{domain::CatalogSnapshot, services::EntityStore};
use crate::test_fixtures::snapshot;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;


/// Store and binding manager built from the shared catalog fixture.
pub(super) struct Bound {
    pub(super) store: EntityStore,
    pub(super) manager: BindingManager<DefaultClock>,
}

#[fixture]
pub(super) fn bound(snapshot: CatalogSnapshot) -> Bound {
    let (store, profiles) = EntityStore::from_snapshot(snapshot).expect("fixture is consistent");
    let manager = BindingManager::new(
        &store,
        ProfileResolver::new(profiles),
        Arc::new(DefaultClock),
    );
    Bound { store, manager }
}
