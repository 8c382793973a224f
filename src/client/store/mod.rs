//! Client state store.
//!
//! Actions are queued on a channel and reduced one at a time by a single
//! task, which then publishes a snapshot of [`RootState`] and hands the
//! action to [`Effects`]. Effects run in their own tasks and report back by
//! dispatching further actions.

pub mod auth;
mod effects;
pub mod favorites;

use tokio::sync::{mpsc, watch};

pub use auth::{AuthAction, AuthState};
pub use effects::Effects;
pub use favorites::{FavoritesAction, FavoritesState};

#[derive(Debug, Clone)]
pub enum Action {
    // ---
    Favorites(FavoritesAction),
    Auth(AuthAction),
}

impl From<FavoritesAction> for Action {
    fn from(action: FavoritesAction) -> Self {
        Action::Favorites(action)
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    // ---
    pub favorites: FavoritesState,
    pub auth: AuthState,
}

fn reduce(state: &mut RootState, action: &Action) {
    // ---
    match action {
        Action::Favorites(action) => favorites::reduce(&mut state.favorites, action),
        Action::Auth(action) => auth::reduce(&mut state.auth, action),
    }
}

/// Handle used by effects to feed results back into the store.
///
/// Does not keep the store alive; once every [`Store`] is dropped, late
/// results are discarded.
#[derive(Clone)]
pub struct Dispatcher {
    // ---
    actions: mpsc::WeakUnboundedSender<Action>,
}

impl Dispatcher {
    pub fn dispatch(&self, action: impl Into<Action>) {
        // ---
        let action = action.into();
        match self.actions.upgrade() {
            Some(actions) => {
                actions.send(action).ok();
            }
            None => tracing::debug!("Store closed, dropping {:?}", action),
        }
    }
}

/// Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct Store {
    // ---
    actions: mpsc::UnboundedSender<Action>,
    state: watch::Receiver<RootState>,
}

impl Store {
    // ---
    /// Starts the reducer task with side effects attached.
    pub fn spawn(effects: Effects) -> Self {
        Self::start(Some(effects))
    }

    /// Starts the reducer task with no side effects; actions only change state.
    pub fn detached() -> Self {
        Self::start(None)
    }

    fn start(effects: Option<Effects>) -> Self {
        // ---
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let (state_tx, state_rx) = watch::channel(RootState::default());
        let dispatcher = Dispatcher {
            actions: tx.downgrade(),
        };

        tokio::spawn(async move {
            while let Some(action) = rx.recv().await {
                tracing::trace!("Reducing {:?}", action);
                state_tx.send_modify(|state| reduce(state, &action));

                if let Some(effects) = &effects {
                    effects.handle(&action, &dispatcher);
                }
            }
            tracing::debug!("Store stopped");
        });

        Self {
            actions: tx,
            state: state_rx,
        }
    }

    pub fn dispatch(&self, action: impl Into<Action>) {
        // ---
        if self.actions.send(action.into()).is_err() {
            tracing::error!("Store task is gone; action dropped");
        }
    }

    /// Latest published snapshot.
    pub fn state(&self) -> RootState {
        self.state.borrow().clone()
    }

    pub fn select<T>(&self, selector: impl FnOnce(&RootState) -> T) -> T {
        selector(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.clone()
    }

    /// Waits until the published state satisfies `predicate`.
    pub async fn wait_for(&self, predicate: impl FnMut(&RootState) -> bool) -> RootState {
        // ---
        let mut rx = self.subscribe();
        let state = match rx.wait_for(predicate).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::favorites::select_count;
    use super::*;
    use crate::domain::Character;

    #[tokio::test]
    async fn actions_are_reduced_in_order() {
        // ---
        let store = Store::detached();

        store.dispatch(FavoritesAction::AddSuccess {
            character: Character::named("char/1", "Jon"),
        });
        store.dispatch(FavoritesAction::AddSuccess {
            character: Character::named("char/2", "Arya"),
        });
        store.dispatch(FavoritesAction::RemoveSuccess {
            url: "char/1".into(),
        });

        let state = store
            .wait_for(|s| {
                select_count(s) == 1 && s.favorites.favorites.iter().all(|c| c.url != "char/1")
            })
            .await;
        assert_eq!(state.favorites.favorites[0].url, "char/2");
    }

    #[tokio::test]
    async fn clones_share_state() {
        // ---
        let store = Store::detached();
        let other = store.clone();

        other.dispatch(AuthAction::CheckAuthStatus);
        store.wait_for(|s| s.auth.is_loading).await;

        assert!(other.select(auth::select_auth_loading));
    }
}
