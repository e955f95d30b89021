//! Binds the pure state to a store: load once, save after every change.

use std::time::Duration;

use grocery_core::{update, Effect, GroceryError, GroceryList, GroceryState, Ingredient, Msg, Notice};
use grocery_logging::{grocery_error, grocery_info};
use tokio_util::sync::CancellationToken;

use crate::store::{load_lists, save_lists, ListStore};
use crate::{ImportError, RecipeImporter, StorageError};

/// A recipe import the host still has to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub list_id: String,
    pub url: String,
}

/// What a dispatched message produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dispatched {
    pub notices: Vec<Notice>,
    pub fetches: Vec<FetchRequest>,
}

/// A committed mutation. `save_error` is set when persisting it failed; the
/// in-memory change stands regardless.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub save_error: Option<StorageError>,
}

pub struct GrocerySession<S: ListStore> {
    store: S,
    state: GroceryState,
}

impl<S: ListStore> GrocerySession<S> {
    /// Waits `load_delay`, then loads lists from `store`. Load problems are
    /// recovered locally and reported as [`Notice::LoadRecovered`].
    pub async fn open(store: S, load_delay: Duration) -> (Self, Vec<Notice>) {
        if !load_delay.is_zero() {
            tokio::time::sleep(load_delay).await;
        }
        let outcome = load_lists(&store);
        let notices = outcome
            .recovered
            .map(|err| Notice::LoadRecovered {
                reason: err.to_string(),
            })
            .into_iter()
            .collect();
        let session = Self {
            store,
            state: GroceryState::from_lists(outcome.lists),
        };
        (session, notices)
    }

    pub fn state(&self) -> &GroceryState {
        &self.state
    }

    pub fn lists(&self) -> &[GroceryList] {
        self.state.lists()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&self) -> Result<(), StorageError> {
        save_lists(&self.store, self.state.lists())
    }

    /// Runs `f` against the state and saves if it changed anything.
    pub fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut GroceryState) -> Result<T, GroceryError>,
    ) -> Result<Mutation<T>, GroceryError> {
        let value = f(&mut self.state)?;
        let save_error = if self.state.consume_dirty() {
            self.save().err()
        } else {
            None
        };
        if let Some(err) = save_error.as_ref() {
            grocery_error!("Error saving lists: {}", err);
        }
        Ok(Mutation { value, save_error })
    }

    /// Runs a message through [`update`] and executes the resulting effects.
    pub fn dispatch(&mut self, msg: Msg) -> Dispatched {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.state.consume_dirty();

        let mut dispatched = Dispatched::default();
        for effect in effects {
            match effect {
                Effect::Persist => {
                    if let Err(err) = self.save() {
                        grocery_error!("Error saving lists: {}", err);
                        dispatched.notices.push(Notice::SaveFailed {
                            reason: err.to_string(),
                        });
                    }
                }
                Effect::FetchRecipe { list_id, url } => {
                    dispatched.fetches.push(FetchRequest { list_id, url })
                }
                Effect::Notify(notice) => dispatched.notices.push(notice),
            }
        }
        dispatched
    }

    /// Feeds a finished import into the list it was requested for.
    pub fn apply_import(
        &mut self,
        request: &FetchRequest,
        result: Result<Vec<Ingredient>, ImportError>,
    ) -> Vec<Notice> {
        match result {
            Ok(ingredients) => {
                self.dispatch(Msg::AddIngredients {
                    list_id: request.list_id.clone(),
                    ingredients,
                })
                .notices
            }
            Err(err) => {
                grocery_info!("Import of {} ended: {}", request.url, err);
                vec![Notice::ImportFailed {
                    list_id: request.list_id.clone(),
                    reason: err.to_string(),
                }]
            }
        }
    }

    /// Requests an import for `list_id` and runs it to completion. Lists
    /// are only touched once the whole pipeline has succeeded.
    pub async fn import_recipe(
        &mut self,
        list_id: &str,
        url: &str,
        importer: &RecipeImporter,
        cancel: &CancellationToken,
    ) -> Vec<Notice> {
        let dispatched = self.dispatch(Msg::ImportRecipeRequested {
            list_id: list_id.to_string(),
            url: url.to_string(),
        });
        let mut notices = dispatched.notices;
        for request in dispatched.fetches {
            let result = importer.import(&request.url, cancel).await;
            notices.extend(self.apply_import(&request, result));
        }
        notices
    }
}
