//! Dashboard routes.
//!
//! Views do not navigate themselves; they return the [`Route`] the user
//! should land on next and the shell (the CLI here) acts on it.

use crate::resource::ResourceKind;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The login page. Every authentication failure lands here.
    Login,
    List(ResourceKind),
    Add(ResourceKind),
    Edit(ResourceKind, DbId),
    Detail(ResourceKind, DbId),
    /// Telegram admin allowlist panel.
    Allowlist,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::List(kind) => format!("/admin/{}", kind.descriptor().route_segment),
            Route::Add(kind) => {
                let d = kind.descriptor();
                format!("/admin/{}/add-{}", d.route_segment, d.route_noun)
            }
            Route::Edit(kind, id) => {
                let d = kind.descriptor();
                format!("/admin/{}/edit-{}/{id}", d.route_segment, d.route_noun)
            }
            Route::Detail(kind, id) => {
                let d = kind.descriptor();
                format!("/admin/{}/view-{}/{id}", d.route_segment, d.route_noun)
            }
            Route::Allowlist => "/admin/telegram".to_string(),
        }
    }

    /// Where a successful edit of `kind` lands: its Detail view when it has
    /// one, otherwise its List view.
    pub fn after_edit(kind: ResourceKind, id: DbId) -> Route {
        if kind.descriptor().has_detail {
            Route::Detail(kind, id)
        } else {
            Route::List(kind)
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
