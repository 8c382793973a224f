use crate::client::store::favorites::select_is_favorite;
use crate::client::store::{FavoritesAction, Store};
use crate::domain::Character;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Quiet period a toggle must survive before it is acted on.
pub const TOGGLE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounced favorite toggle.
///
/// Rapid toggles collapse into the last one. Once no new toggle has arrived
/// for the quiet period, the store decides the direction: a favorite is
/// removed, anything else is added.
pub struct FavoriteToggle {
    // ---
    intents: mpsc::UnboundedSender<Character>,
}

impl FavoriteToggle {
    // ---
    pub fn spawn(store: Store, quiet: Duration) -> Self {
        // ---
        let (intents, mut rx) = mpsc::unbounded_channel::<Character>();

        tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                // ---
                loop {
                    match timeout(quiet, rx.recv()).await {
                        Ok(Some(next)) => pending = next,
                        // Toggle dropped while an intent was pending.
                        Ok(None) => return,
                        Err(_) => break,
                    }
                }

                let action = if store.select(select_is_favorite(&pending.url)) {
                    FavoritesAction::Remove { url: pending.url }
                } else {
                    FavoritesAction::Add { character: pending }
                };
                tracing::debug!("Toggle settled: {:?}", action);
                store.dispatch(action);
            }
        });

        Self { intents }
    }

    pub fn toggle(&self, character: Character) {
        // ---
        if character.url.is_empty() {
            tracing::warn!("Ignoring toggle for a character without url");
            return;
        }

        if self.intents.send(character).is_err() {
            tracing::error!("Toggle task is gone; intent dropped");
        }
    }
}
