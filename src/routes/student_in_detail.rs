use crate::{
    auth::RollbookSession,
    error::{MissingStudentSnafu, RollbookResult},
    maud_conveniences::title,
    routes::students::student_card,
    state::AppState,
    store::StudentStore,
};
use axum::extract::{Path, State};
use maud::{Markup, html};
use snafu::OptionExt;

/// Read-only detail page; record actions live on the list view.
pub async fn get_student(
    State(state): State<AppState>,
    session: RollbookSession,
    Path(id): Path<i32>,
) -> RollbookResult<Markup> {
    let student = state
        .store()
        .get(id)
        .await?
        .context(MissingStudentSnafu { id })?;

    Ok(state.render(session, html! {
        div class="container mx-auto px-4 py-8" {
            div class="bg-gray-800 p-6 md:p-8 rounded-lg shadow-xl" {
                (title(&student.name))
                (student_card(&student, false))
            }
        }
    }))
}
