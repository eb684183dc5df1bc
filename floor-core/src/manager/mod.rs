//! LayoutManager - occupancy state machine over the layout store
//!
//! One manager per staff session. All mutations run synchronously on the
//! interaction thread and are atomic-or-noop: every precondition is
//! checked before anything is touched, so a failed operation leaves the
//! store exactly as it was.
//!
//! # Operation flow
//!
//! ```text
//! operation(args)
//!     ├─ 1. Locate entities (NotFound on missing ids)
//!     ├─ 2. Validate transitions and inputs (InvalidTransition)
//!     ├─ 3. Mutate the store
//!     ├─ 4. Recompute derived totals
//!     ├─ 5. Enqueue a background save of the full layout
//!     └─ 6. Broadcast a FloorEvent
//! ```

pub mod transitions;

#[cfg(test)]
mod tests;

use crate::error::{FloorError, FloorResult};
use crate::events::{EVENT_CHANNEL_CAPACITY, FloorEvent};
use crate::layout::LayoutStore;
use crate::money;
use crate::persistence::save_worker::{SaveHandle, SaveRequest};
use crate::persistence::PersistenceAdapter;
use crate::selection::{Selection, SelectionController};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::floor::{
    Account, AccountItem, AccountStatus, Orientation, Position, Seatable, Section, Size, UnitKind,
    UnitStatus,
};
use tokio::sync::broadcast;

/// Input for one ordered line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub product_name: String,
    /// Negative quantities are compensating entries
    pub quantity: i32,
    pub unit_price: f64,
}

impl ItemInput {
    pub fn new(product_name: impl Into<String>, quantity: i32, unit_price: f64) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }
}

/// Floor state machine for one user session
pub struct LayoutManager {
    user_id: String,
    store: LayoutStore,
    selection: SelectionController,
    event_tx: broadcast::Sender<FloorEvent>,
    saver: Option<SaveHandle>,
    adapter: Option<PersistenceAdapter>,
}

impl std::fmt::Debug for LayoutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutManager")
            .field("user_id", &self.user_id)
            .field("section_count", &self.store.sections().len())
            .finish()
    }
}

impl LayoutManager {
    /// Create a manager over an existing store, without persistence
    pub fn new(user_id: impl Into<String>, store: LayoutStore) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            user_id: user_id.into(),
            store,
            selection: SelectionController::new(),
            event_tx,
            saver: None,
            adapter: None,
        }
    }

    /// Load the user's layout (or seed the default) and return a manager
    /// wired to the adapter. Load failures degrade to the seed; they never
    /// block the session.
    pub async fn hydrate(user_id: impl Into<String>, adapter: PersistenceAdapter) -> Self {
        let user_id = user_id.into();
        let store = match adapter.load_layout(&user_id).await {
            Some(hydrated) => {
                tracing::info!(
                    user_id = %user_id,
                    section_count = hydrated.sections.len(),
                    "Layout hydrated from storage"
                );
                LayoutStore::new(hydrated.sections, hydrated.table_counter)
            }
            None => {
                tracing::info!(user_id = %user_id, "No saved layout, seeding default");
                LayoutStore::seeded()
            }
        };

        let mut manager = Self::new(user_id, store);
        manager.adapter = Some(adapter);
        manager.broadcast(FloorEvent::LayoutHydrated {
            section_count: manager.store.sections().len(),
        });
        manager
    }

    /// Wire the background save worker handle
    pub fn attach_saver(&mut self, saver: SaveHandle) {
        self.saver = Some(saver);
    }

    // ========== Accessors ==========

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// Read-only snapshot of the floor plan
    pub fn sections(&self) -> &[Section] {
        self.store.sections()
    }

    /// Subscribe to state-change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<FloorEvent> {
        self.event_tx.subscribe()
    }

    // ========== Occupancy Operations ==========

    /// Seat a free unit: opens an `abierta` account, makes it current and
    /// marks the unit `ocupada`. Returns the new account id.
    pub fn seat_unit(&mut self, unit_id: &str) -> FloorResult<String> {
        let unit = self
            .store
            .unit_mut(unit_id)
            .ok_or_else(|| FloorError::not_found("unit", unit_id))?;
        if unit.status() != UnitStatus::Libre {
            return Err(FloorError::InvalidTransition(format!(
                "unit {} is {:?}, only a free unit can be seated",
                unit_id,
                unit.status()
            )));
        }

        let account_id = open_account_on(unit)?;
        tracing::debug!(unit_id = %unit_id, account_id = %account_id, "Unit seated");
        self.committed(FloorEvent::AccountOpened {
            unit_id: unit_id.to_string(),
            account_id: account_id.clone(),
        });
        Ok(account_id)
    }

    /// Hold a free unit for a reservation
    pub fn reserve_unit(&mut self, unit_id: &str) -> FloorResult<()> {
        self.transition_unit(unit_id, UnitStatus::Reservada)
    }

    /// Release a reservation (no-show or cancellation).
    ///
    /// Only a `reservada` unit qualifies: `por-pagar` also transitions to
    /// `libre`, but that edge belongs to settlement alone.
    pub fn cancel_reservation(&mut self, unit_id: &str) -> FloorResult<()> {
        let unit = self
            .store
            .unit_mut(unit_id)
            .ok_or_else(|| FloorError::not_found("unit", unit_id))?;
        if unit.status() != UnitStatus::Reservada {
            return Err(FloorError::InvalidTransition(format!(
                "unit {} is {:?}, only a reservation can be cancelled",
                unit_id,
                unit.status()
            )));
        }
        unit.set_status(UnitStatus::Libre);
        self.committed(FloorEvent::UnitStatusChanged {
            unit_id: unit_id.to_string(),
            status: UnitStatus::Libre,
        });
        Ok(())
    }

    /// The reserved guests arrived: open their account
    pub fn seat_reservation(&mut self, unit_id: &str) -> FloorResult<String> {
        let unit = self
            .store
            .unit_mut(unit_id)
            .ok_or_else(|| FloorError::not_found("unit", unit_id))?;
        if unit.status() != UnitStatus::Reservada {
            return Err(FloorError::InvalidTransition(format!(
                "unit {} is {:?}, only a reserved unit can seat its reservation",
                unit_id,
                unit.status()
            )));
        }

        let account_id = open_account_on(unit)?;
        tracing::debug!(unit_id = %unit_id, account_id = %account_id, "Reservation seated");
        self.committed(FloorEvent::AccountOpened {
            unit_id: unit_id.to_string(),
            account_id: account_id.clone(),
        });
        Ok(account_id)
    }

    /// Append one ordered line to an account on the given unit.
    ///
    /// Fails while the account is frozen (`lista-para-cobrar`) or settled.
    /// A first item advances the account to `en-consumo`; the stored total
    /// is recomputed from the item list on every append.
    pub fn add_item(
        &mut self,
        unit_id: &str,
        account_id: &str,
        input: ItemInput,
    ) -> FloorResult<()> {
        money::validate_item_input(&input)?;

        let unit = self
            .store
            .unit_mut(unit_id)
            .ok_or_else(|| FloorError::not_found("unit", unit_id))?;
        let idx = account_index(unit, account_id)?;
        let status = unit.accounts()[idx].status;
        if !status.accepts_items() {
            return Err(FloorError::InvalidTransition(format!(
                "account {} is {:?} and no longer accepts items",
                account_id, status
            )));
        }

        // All checks passed, mutate
        let account = &mut unit.accounts_mut()[idx];
        account.items.push(AccountItem {
            id: uuid::Uuid::new_v4().to_string(),
            product_name: input.product_name,
            quantity: input.quantity,
            unit_price: input.unit_price,
            total: money::line_total(input.quantity, input.unit_price),
            timestamp: Utc::now(),
        });
        money::recalculate_account_total(account);
        if account.status == AccountStatus::Abierta {
            account.status = AccountStatus::EnConsumo;
        }
        let account_total = account.total;

        self.committed(FloorEvent::ItemsAdded {
            unit_id: unit_id.to_string(),
            account_id: account_id.to_string(),
            account_total,
        });
        Ok(())
    }

    /// Request the check: freezes the account and marks the unit
    /// `por-pagar` until settlement.
    pub fn request_check(&mut self, account_id: &str) -> FloorResult<()> {
        let unit = self
            .store
            .unit_with_account_mut(account_id)
            .ok_or_else(|| FloorError::not_found("account", account_id))?;

        let idx = account_index(unit, account_id)?;
        let account_status = unit.accounts()[idx].status;
        if !transitions::account_transition_allowed(account_status, AccountStatus::ListaParaCobrar)
        {
            return Err(FloorError::InvalidTransition(format!(
                "account {} is {:?}, the check can only be requested while open",
                account_id, account_status
            )));
        }
        if !transitions::unit_transition_allowed(unit.status(), UnitStatus::PorPagar) {
            return Err(FloorError::InvalidTransition(format!(
                "unit {} is {:?}, cannot move to por-pagar",
                unit.id(),
                unit.status()
            )));
        }

        let unit_id = unit.id().to_string();
        unit.accounts_mut()[idx].status = AccountStatus::ListaParaCobrar;
        unit.set_status(UnitStatus::PorPagar);

        tracing::debug!(unit_id = %unit_id, account_id = %account_id, "Check requested");
        self.committed(FloorEvent::CheckRequested {
            unit_id,
            account_id: account_id.to_string(),
        });
        Ok(())
    }

    /// Settle an account: stamps `closedAt` exactly once, records the
    /// payment method, clears the unit's current account and frees the
    /// unit. Settling an already-settled account fails and mutates
    /// nothing.
    pub fn settle_account(&mut self, account_id: &str, payment_method: &str) -> FloorResult<()> {
        let unit = self
            .store
            .unit_with_account_mut(account_id)
            .ok_or_else(|| FloorError::not_found("account", account_id))?;

        let idx = account_index(unit, account_id)?;
        let account_status = unit.accounts()[idx].status;
        if !transitions::account_transition_allowed(account_status, AccountStatus::Pagada) {
            return Err(FloorError::InvalidTransition(format!(
                "account {} is {:?}, only lista-para-cobrar settles",
                account_id, account_status
            )));
        }
        if !transitions::unit_transition_allowed(unit.status(), UnitStatus::Libre) {
            return Err(FloorError::InvalidTransition(format!(
                "unit {} is {:?}, cannot be freed",
                unit.id(),
                unit.status()
            )));
        }

        let unit_id = unit.id().to_string();
        {
            let account = &mut unit.accounts_mut()[idx];
            account.status = AccountStatus::Pagada;
            account.closed_at = Some(Utc::now());
            account.payment_method = Some(payment_method.to_string());
        }
        unit.set_current_account_id(None);
        unit.set_status(UnitStatus::Libre);

        tracing::info!(
            unit_id = %unit_id,
            account_id = %account_id,
            payment_method = %payment_method,
            "Account settled"
        );
        self.committed(FloorEvent::AccountSettled {
            unit_id,
            account_id: account_id.to_string(),
            payment_method: payment_method.to_string(),
        });
        Ok(())
    }

    // ========== Structural Edits ==========

    /// Add a new empty section, returns its id
    pub fn add_section(
        &mut self,
        name: impl Into<String>,
        position: Position,
        size: Size,
    ) -> String {
        let section_id = self.store.add_section(name, position, size);
        self.committed(FloorEvent::SectionMutated {
            section_id: section_id.clone(),
        });
        section_id
    }

    /// Delete a section and everything it owns
    pub fn remove_section(&mut self, section_id: &str) -> FloorResult<()> {
        self.store.remove_section(section_id)?;
        self.selection.drop_if_in_section(section_id);
        self.committed(FloorEvent::SectionMutated {
            section_id: section_id.to_string(),
        });
        Ok(())
    }

    /// Add a table named from the persisted counter, returns its id
    pub fn add_table(&mut self, section_id: &str, position: Position) -> FloorResult<String> {
        let unit_id = self.store.add_table(section_id, position)?;
        self.committed(FloorEvent::SectionMutated {
            section_id: section_id.to_string(),
        });
        Ok(unit_id)
    }

    /// Add a bar, returns its id
    pub fn add_bar(
        &mut self,
        section_id: &str,
        position: Position,
        size: Size,
        orientation: Orientation,
    ) -> FloorResult<String> {
        let unit_id = self.store.add_bar(section_id, position, size, orientation)?;
        self.committed(FloorEvent::SectionMutated {
            section_id: section_id.to_string(),
        });
        Ok(unit_id)
    }

    /// Apply an arbitrary edit to a section (rename, resize, reposition)
    pub fn mutate_section<F>(&mut self, section_id: &str, updater: F) -> FloorResult<()>
    where
        F: FnOnce(&mut Section),
    {
        self.store.mutate_section(section_id, updater)?;
        self.committed(FloorEvent::SectionMutated {
            section_id: section_id.to_string(),
        });
        Ok(())
    }

    /// Move a unit within its section
    pub fn move_unit(
        &mut self,
        section_id: &str,
        unit_id: &str,
        position: Position,
    ) -> FloorResult<()> {
        self.store.move_unit(section_id, unit_id, position)?;
        self.committed(FloorEvent::SectionMutated {
            section_id: section_id.to_string(),
        });
        Ok(())
    }

    /// Remove a unit and its account history
    pub fn remove_unit(&mut self, section_id: &str, unit_id: &str) -> FloorResult<()> {
        self.store.remove_unit(section_id, unit_id)?;
        self.selection.drop_if_item(unit_id);
        self.committed(FloorEvent::SectionMutated {
            section_id: section_id.to_string(),
        });
        Ok(())
    }

    // ========== Selection ==========

    /// Focus a unit for editing; fails on unknown ids leaving the prior
    /// selection intact
    pub fn select(&mut self, kind: UnitKind, section_id: &str, item_id: &str) -> FloorResult<()> {
        self.selection.select(&self.store, kind, section_id, item_id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.selection()
    }

    // ========== Persistence ==========

    /// Explicit save point, awaited (e.g. before ending a shift).
    /// Sessions without an adapter are in-memory only.
    pub async fn save_now(&self) -> FloorResult<()> {
        let Some(adapter) = &self.adapter else {
            tracing::debug!(user_id = %self.user_id, "No persistence adapter, skipping save");
            return Ok(());
        };
        adapter
            .save_layout(
                &self.user_id,
                self.store.sections(),
                self.store.table_counter(),
            )
            .await
    }

    // ========== Internals ==========

    /// Plain unit status change with no account involvement
    fn transition_unit(&mut self, unit_id: &str, to: UnitStatus) -> FloorResult<()> {
        let unit = self
            .store
            .unit_mut(unit_id)
            .ok_or_else(|| FloorError::not_found("unit", unit_id))?;
        if !transitions::unit_transition_allowed(unit.status(), to) {
            return Err(FloorError::InvalidTransition(format!(
                "unit {} cannot move from {:?} to {:?}",
                unit_id,
                unit.status(),
                to
            )));
        }
        unit.set_status(to);
        self.committed(FloorEvent::UnitStatusChanged {
            unit_id: unit_id.to_string(),
            status: to,
        });
        Ok(())
    }

    /// After a successful mutation: snapshot to the save queue and notify
    fn committed(&mut self, event: FloorEvent) {
        if let Some(saver) = &self.saver {
            saver.enqueue(SaveRequest {
                user_id: self.user_id.clone(),
                sections: self.store.sections().to_vec(),
                table_counter: self.store.table_counter(),
            });
        }
        self.broadcast(event);
    }

    fn broadcast(&self, event: FloorEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Event broadcast skipped: no active receivers");
        }
    }
}

/// Position of an account in a unit's history
fn account_index(unit: &dyn Seatable, account_id: &str) -> FloorResult<usize> {
    unit.accounts()
        .iter()
        .position(|a| a.id == account_id)
        .ok_or_else(|| FloorError::not_found("account", account_id))
}

/// Open a fresh account on a unit and make it current. The caller has
/// already validated the unit status.
fn open_account_on(unit: &mut dyn Seatable) -> FloorResult<String> {
    if unit.has_open_account() {
        return Err(FloorError::InvalidTransition(format!(
            "unit {} already has an open account",
            unit.id()
        )));
    }
    let account = Account::open(Utc::now());
    let account_id = account.id.clone();
    unit.accounts_mut().push(account);
    unit.set_current_account_id(Some(account_id.clone()));
    unit.set_status(UnitStatus::Ocupada);
    Ok(account_id)
}
