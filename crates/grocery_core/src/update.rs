use crate::ledger::{AddOutcome, ClearOutcome};
use crate::{Effect, GroceryError, GroceryState, Msg, Notice};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every committed mutation yields exactly one [`Effect::Persist`], batch
/// additions included. Rejected messages leave state untouched and yield a
/// single [`Notice::Rejected`].
pub fn update(mut state: GroceryState, msg: Msg) -> (GroceryState, Vec<Effect>) {
    let result = apply(&mut state, msg);
    let effects = match result {
        Ok(Applied {
            persist,
            request,
            notice,
        }) => {
            let mut effects = Vec::with_capacity(2);
            if persist {
                effects.push(Effect::Persist);
            }
            effects.extend(request);
            effects.extend(notice.map(Effect::Notify));
            effects
        }
        Err(Deferred::Rejected(err)) => {
            if err.is_not_found() {
                grocery_logging::grocery_warn!("Rejected message with stale id: {}", err);
            } else {
                grocery_logging::grocery_debug!("Rejected message: {}", err);
            }
            vec![Effect::Notify(Notice::Rejected(err))]
        }
        Err(Deferred::Notice(notice)) => vec![Effect::Notify(notice)],
    };

    (state, effects)
}

struct Applied {
    persist: bool,
    /// Work handed to the host, such as a recipe fetch.
    request: Option<Effect>,
    notice: Option<Notice>,
}

impl Applied {
    fn committed(notice: Notice) -> Self {
        Self {
            persist: true,
            request: None,
            notice: Some(notice),
        }
    }

    fn saved_quietly() -> Self {
        Self {
            persist: true,
            request: None,
            notice: None,
        }
    }

    fn unchanged(notice: Option<Notice>) -> Self {
        Self {
            persist: false,
            request: None,
            notice,
        }
    }

    fn requested(effect: Effect) -> Self {
        Self {
            persist: false,
            request: Some(effect),
            notice: None,
        }
    }
}

/// Messages refused before any state change.
enum Deferred {
    Rejected(GroceryError),
    Notice(Notice),
}

impl From<GroceryError> for Deferred {
    fn from(err: GroceryError) -> Self {
        Deferred::Rejected(err)
    }
}

fn apply(state: &mut GroceryState, msg: Msg) -> Result<Applied, Deferred> {
    let applied = match msg {
        Msg::CreateList { name } => {
            let list_id = state.create_list(&name)?;
            Applied::committed(Notice::ListCreated {
                list_id,
                name: name.trim().to_string(),
            })
        }
        Msg::RenameList { list_id, name } => {
            if state.rename_list(&list_id, &name)? {
                Applied::committed(Notice::ListRenamed {
                    list_id,
                    name: name.trim().to_string(),
                })
            } else {
                Applied::unchanged(None)
            }
        }
        Msg::DeleteList { list_id } => {
            let removed = state.delete_list(&list_id)?;
            Applied::committed(Notice::ListDeleted { name: removed.name })
        }
        Msg::SelectList { list_id } => {
            state.select_list(&list_id)?;
            Applied::unchanged(None)
        }
        Msg::AddItem {
            list_id,
            name,
            quantity,
            unit,
        } => {
            let name = name.trim().to_lowercase();
            let notice = match state.add_item(&list_id, &name, quantity, unit)? {
                AddOutcome::Added { .. } => Notice::ItemAdded {
                    list_id,
                    name,
                    quantity,
                    unit,
                },
                AddOutcome::Updated { quantity, .. } => Notice::ItemUpdated {
                    list_id,
                    name,
                    quantity,
                    unit,
                },
            };
            Applied::committed(notice)
        }
        Msg::AddIngredients {
            list_id,
            ingredients,
        } => {
            let outcome = state.add_items(&list_id, &ingredients)?;
            let notice = Notice::ItemsImported {
                list_id,
                added: outcome.added,
                updated: outcome.updated,
                skipped: outcome.skipped.len(),
            };
            if outcome.changed() {
                Applied::committed(notice)
            } else {
                Applied::unchanged(Some(notice))
            }
        }
        Msg::ToggleItem { list_id, item_id } => match state.toggle_item(&list_id, &item_id)? {
            Some(_) => Applied::saved_quietly(),
            None => Applied::unchanged(None),
        },
        Msg::DeleteItem { list_id, item_id } => {
            let removed = state.delete_item(&list_id, &item_id)?;
            Applied::committed(Notice::ItemRemoved {
                list_id,
                name: removed.name,
            })
        }
        Msg::UpdateItemQuantity {
            list_id,
            item_id,
            quantity,
            unit,
        } => {
            state.update_item_quantity(&list_id, &item_id, quantity, unit)?;
            Applied::saved_quietly()
        }
        Msg::ClearList { list_id } => match state.clear_list(&list_id)? {
            ClearOutcome::Cleared { removed } => {
                Applied::committed(Notice::ListCleared { list_id, removed })
            }
            ClearOutcome::AlreadyEmpty => {
                Applied::unchanged(Some(Notice::NothingToClear { list_id }))
            }
        },
        Msg::ShareList { list_id } => {
            let was_shared = state.list(&list_id).is_some_and(|list| list.share_id.is_some());
            let share_id = state.share_list(&list_id)?;
            let notice = Notice::ListShared { list_id, share_id };
            if was_shared {
                Applied::unchanged(Some(notice))
            } else {
                Applied::committed(notice)
            }
        }
        Msg::UnshareList { list_id } => {
            if state.unshare_list(&list_id)? {
                Applied::committed(Notice::ListUnshared { list_id })
            } else {
                Applied::unchanged(None)
            }
        }
        Msg::ImportRecipeRequested { list_id, url } => {
            if state.list(&list_id).is_none() {
                return Err(GroceryError::ListNotFound(list_id).into());
            }
            let url = url.trim().to_string();
            if let Err(err) = url::Url::parse(&url) {
                return Err(Deferred::Notice(Notice::ImportFailed {
                    list_id,
                    reason: format!("invalid recipe url: {err}"),
                }));
            }
            Applied::requested(Effect::FetchRecipe { list_id, url })
        }
    };
    Ok(applied)
}
