use crate::{
    auth::backend::RollbookAuthBackend,
    error::{NotSignedInSnafu, RollbookResult},
};
use axum_login::AuthSession;

pub mod backend;

pub type RollbookSession = AuthSession<RollbookAuthBackend>;

pub trait AuthUtilities {
    fn signed_in(&self) -> bool;
    fn ensure_signed_in(&self) -> RollbookResult<()>;
}

impl AuthUtilities for RollbookSession {
    fn signed_in(&self) -> bool {
        self.user.is_some()
    }

    fn ensure_signed_in(&self) -> RollbookResult<()> {
        snafu::ensure!(self.user.is_some(), NotSignedInSnafu);
        Ok(())
    }
}
