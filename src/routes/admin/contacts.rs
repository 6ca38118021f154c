use rocket::response::{Flash, Redirect};
use rocket::State;
use std::sync::Arc;

use super::CONTACTS_VIEW;
use crate::security::auth::AdminUser;
use crate::store::Store;

// ── Contacts ───────────────────────────────────────────

#[post("/contacts/<id>/delete")]
pub fn contact_delete(
    _admin: AdminUser,
    store: &State<Arc<dyn Store>>,
    id: i64,
) -> Result<Flash<Redirect>, Redirect> {
    let sender = store
        .contact_find_by_id(id)
        .map(|c| c.email)
        .unwrap_or_default();
    match store.contact_delete(id) {
        Ok(()) => {
            log::info!("Contact {} from {} deleted", id, sender);
            Ok(Flash::success(
                Redirect::to(CONTACTS_VIEW),
                "Contact deleted successfully!",
            ))
        }
        Err(e) => {
            log::error!("Error deleting contact {}: {}", id, e);
            Err(Redirect::to(CONTACTS_VIEW))
        }
    }
}
