//! Favorites slice: actions, reducer and selectors.
//!
//! The reducer only applies confirmed results. `Add` and `Remove` mark the
//! slice as loading and leave the list alone until the matching success
//! action arrives.

use super::RootState;
use crate::domain::Character;

#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesAction {
    // ---
    Load,
    LoadSuccess { favorites: Vec<Character> },
    LoadFailure { error: String },

    Add { character: Character },
    AddSuccess { character: Character },
    AddFailure { error: String },

    Remove { url: String },
    RemoveSuccess { url: String },
    RemoveFailure { error: String },

    /// Empties the slice without touching any source.
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesState {
    // ---
    pub favorites: Vec<Character>,
    pub loading: bool,
    pub error: Option<String>,
}

pub fn reduce(state: &mut FavoritesState, action: &FavoritesAction) {
    // ---
    use FavoritesAction::*;

    match action {
        Load | Add { .. } | Remove { .. } => {
            state.loading = true;
            state.error = None;
        }
        LoadSuccess { favorites } => {
            state.favorites = favorites.clone();
            settle(state, None);
        }
        AddSuccess { character } => {
            // A repeated add can be confirmed twice; the list stays unique.
            if !state.favorites.iter().any(|fav| fav.url == character.url) {
                state.favorites.push(character.clone());
            }
            settle(state, None);
        }
        RemoveSuccess { url } => {
            state.favorites.retain(|fav| &fav.url != url);
            settle(state, None);
        }
        LoadFailure { error } | AddFailure { error } | RemoveFailure { error } => {
            settle(state, Some(error.clone()));
        }
        Clear => {
            state.favorites.clear();
            settle(state, None);
        }
    }
}

fn settle(state: &mut FavoritesState, error: Option<String>) {
    state.loading = false;
    state.error = error;
}

// --- selectors

pub fn select_favorites(state: &RootState) -> &[Character] {
    &state.favorites.favorites
}

pub fn select_loading(state: &RootState) -> bool {
    state.favorites.loading
}

pub fn select_error(state: &RootState) -> Option<&str> {
    state.favorites.error.as_deref()
}

pub fn select_count(state: &RootState) -> usize {
    state.favorites.favorites.len()
}

/// Builds a selector answering whether `url` is among the favorites.
pub fn select_is_favorite(url: &str) -> impl Fn(&RootState) -> bool + '_ {
    move |state| state.favorites.favorites.iter().any(|fav| fav.url == url)
}
