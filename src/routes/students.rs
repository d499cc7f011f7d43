use crate::{
    auth::{AuthUtilities, RollbookSession},
    data::{IdForm, student::Student},
    error::{MissingStudentSnafu, RollbookResult},
    maud_conveniences::{Email, render_table, subtitle},
    state::AppState,
    store::StudentStore,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use maud::{Markup, html};
use serde::Deserialize;
use snafu::OptionExt;

#[axum::debug_handler]
pub async fn get_students_page(
    State(state): State<AppState>,
    session: RollbookSession,
) -> impl IntoResponse {
    state.render(session, html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col space-y-4" {
            input type="search" name="search" placeholder="Filter by name..."
                hx-get="/internal/students" hx-trigger="input changed delay:300ms" hx-target="#all_students"
                class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none bg-gray-700 border-gray-600";
            div class="container flex flex-row justify-center space-x-4" {
                div id="all_students" hx-get="/internal/students" hx-trigger="load" {}
                div id="in_focus" {}
            }
        }
    })
}

#[derive(Deserialize)]
pub struct SearchForm {
    pub search: Option<String>,
}

pub async fn internal_get_students(
    State(state): State<AppState>,
    session: RollbookSession,
    Query(SearchForm { search }): Query<SearchForm>,
) -> RollbookResult<Markup> {
    let mut students = state.store().list().await?;
    if let Some(search) = search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        students.retain(|student| student.name.to_lowercase().contains(&needle));
    }

    let signed_in = session.signed_in();

    let rows = students
        .iter()
        .map(|student| {
            [
                html! {
                    a hx-get={"/internal/students/detail?id=" (student.id)} hx-target="#in_focus" class="cursor-pointer hover:underline" {
                        (student.name)
                    }
                },
                html! { (student.blood_group) },
                html! { (student.address.city) },
                html! {
                    @if signed_in {
                        div class="flex flex-row space-x-2" {
                            button class="bg-blue-600 hover:bg-blue-800 font-bold py-1 px-2 rounded" hx-get={"/internal/students/form?id=" (student.id)} hx-target="#in_focus" {
                                "Edit"
                            }
                            button class="bg-red-600 hover:bg-red-800 font-bold py-1 px-2 rounded" hx-delete={"/students?id=" (student.id)} hx-confirm={"Do you want to delete student with id: " (student.id) "?"} hx-target="#all_students" {
                                "Delete"
                            }
                        }
                    }
                },
            ]
        })
        .collect();

    Ok(html! {
        div class="container mx-auto flex flex-col space-y-4" {
            @if signed_in {
                div class="flex flex-row justify-end" {
                    button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get="/internal/students/form" hx-target="#in_focus" {
                        "Add new Student"
                    }
                }
            }
            (render_table("Students", ["Name", "Blood Group", "City", ""], rows))
        }
    })
}

pub async fn internal_get_student_in_detail(
    State(state): State<AppState>,
    session: RollbookSession,
    Query(IdForm { id }): Query<IdForm>,
) -> RollbookResult<Markup> {
    let student = state
        .store()
        .get(id)
        .await?
        .context(MissingStudentSnafu { id })?;

    Ok(student_card(&student, session.signed_in()))
}

pub async fn delete_student(
    State(state): State<AppState>,
    session: RollbookSession,
    Query(IdForm { id }): Query<IdForm>,
) -> RollbookResult<Markup> {
    session.ensure_signed_in()?;

    state
        .store()
        .delete(id)
        .await?
        .context(MissingStudentSnafu { id })?;
    info!(id, "Student deleted from list view");

    internal_get_students(State(state), session, Query(SearchForm { search: None })).await
}

pub fn student_card(student: &Student, signed_in: bool) -> Markup {
    let labelled = |label: &'static str, value: Markup| {
        html! {
            p class="text-gray-200 font-semibold" {
                (label)
                ": "
                span class="font-medium" {(value)}
            }
        }
    };

    html! {
        div class="rounded-lg shadow-md overflow-hidden bg-gray-800 max-w-md mx-auto" {
            div class="p-4" {
                (subtitle(&student.name))

                div class="py-2 space-y-1" {
                    (labelled("Gender", html! {(student.gender)}))
                    (labelled("Blood Group", html! {(student.blood_group)}))
                    @if let Some(email) = student.email.as_deref() {
                        (labelled("Email", html! {(Email(email))}))
                    }
                    @if let Some(phone) = student.phone.as_deref() {
                        (labelled("Phone", html! {(phone)}))
                    }
                }

                div class="py-2" {
                    p class="text-gray-300 text-sm" {"Address:"}
                    p class="text-gray-100" {(student.address.street)}
                    p class="text-gray-100" {
                        (student.address.city)
                        @if let Some(region) = student.address.state.as_deref() {
                            ", "
                            (region)
                        }
                    }
                    p class="text-gray-100" {(student.address.country)}
                }

                @if signed_in {
                    div class="flex flex-row space-x-2 pt-2" {
                        button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get={"/internal/students/form?id=" (student.id)} hx-target="#in_focus" {
                            "Edit"
                        }
                        button class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" hx-delete={"/students?id=" (student.id)} hx-confirm={"Do you want to delete student with id: " (student.id) "?"} hx-target="#all_students" {
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}
