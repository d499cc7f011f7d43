use crate::{
    auth::{AuthUtilities, RollbookSession},
    data::student::{SaveAddress, SaveStudent},
    error::{MissingStudentSnafu, RollbookError, RollbookResult, ValidationSnafu},
    maud_conveniences::{form_element, form_submit_button, simple_form_element, title},
    routes::students::student_card,
    state::AppState,
    store::StudentStore,
};
use axum::{
    Form,
    extract::{Query, State},
};
use maud::{Markup, html};
use serde::Deserialize;
use snafu::OptionExt;

const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

#[derive(Deserialize)]
pub struct OptionalIdForm {
    pub id: Option<i32>,
}

/// One form for both adding and editing; editing pre-populates from the
/// stored record and carries the id in a hidden field.
pub async fn internal_get_student_form(
    State(state): State<AppState>,
    session: RollbookSession,
    Query(OptionalIdForm { id }): Query<OptionalIdForm>,
) -> RollbookResult<Markup> {
    session.ensure_signed_in()?;

    let prefill = match id {
        Some(id) => state
            .store()
            .get(id)
            .await?
            .context(MissingStudentSnafu { id })?
            .into(),
        None => SaveStudent::default(),
    };

    Ok(student_form(&prefill, &[]))
}

fn student_form(prefill: &SaveStudent, messages: &[String]) -> Markup {
    let editing = prefill.id.is_some();
    let address = prefill.address.clone().unwrap_or_default();

    html! {
        @if editing {
            (title("Edit Student"))
        } @else {
            (title("Add New Student"))
        }

        @if !messages.is_empty() {
            div role="alert" class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" {
                ul {
                    @for message in messages {
                        li {(message)}
                    }
                }
            }
        }

        form hx-put=[(!editing).then_some("/internal/students/form")] hx-post=[editing.then_some("/internal/students/form")] hx-trigger="submit" hx-target="#in_focus" class="p-4" {
            @if let Some(id) = prefill.id {
                input type="hidden" name="id" value=(id);
            }

            (simple_form_element("name", "Name", true, None, Some(&prefill.name)))
            (simple_form_element("email", "Email", false, Some("email"), prefill.email.as_deref()))
            (simple_form_element("phone", "Phone", false, Some("tel"), prefill.phone.as_deref()))
            (simple_form_element("gender", "Gender", true, None, Some(&prefill.gender)))

            (form_element("blood_group", "Blood Group", html! {
                input id="blood_group" name="blood_group" required list="blood_groups" value=(prefill.blood_group) class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
                datalist id="blood_groups" {
                    @for group in BLOOD_GROUPS {
                        option value=(group) {}
                    }
                }
            }))

            (simple_form_element("street", "Street", true, None, Some(&address.street)))
            (simple_form_element("city", "City", true, None, Some(&address.city)))
            (simple_form_element("state", "State", false, None, address.state.as_deref()))
            (simple_form_element("country", "Country", true, None, Some(&address.country)))

            (form_submit_button(Some("Save Student")))
        }
    }
}

#[derive(Deserialize)]
pub struct StudentFormData {
    #[serde(default)]
    id: Option<i32>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    gender: String,
    #[serde(default)]
    blood_group: String,
    #[serde(default)]
    street: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    country: String,
}

impl From<StudentFormData> for SaveStudent {
    fn from(form: StudentFormData) -> Self {
        Self {
            id: form.id,
            name: form.name,
            email: Some(form.email),
            phone: Some(form.phone),
            gender: form.gender,
            blood_group: form.blood_group,
            address: Some(SaveAddress {
                street: form.street,
                city: form.city,
                state: Some(form.state),
                country: form.country,
            }),
        }
    }
}

pub async fn internal_put_new_student(
    State(state): State<AppState>,
    session: RollbookSession,
    Form(form): Form<StudentFormData>,
) -> RollbookResult<Markup> {
    session.ensure_signed_in()?;

    let save = SaveStudent::from(form);
    match save.clone().validate() {
        Ok(draft) => {
            let created = state.store().create(draft).await?;
            info!(id = created.id, "Student created from form");
            Ok(student_card(&created, true))
        }
        Err(RollbookError::Validation { messages }) => Ok(student_form(&save, &messages)),
        Err(other) => Err(other),
    }
}

pub async fn internal_post_update_student(
    State(state): State<AppState>,
    session: RollbookSession,
    Form(form): Form<StudentFormData>,
) -> RollbookResult<Markup> {
    session.ensure_signed_in()?;

    let save = SaveStudent::from(form);
    let Some(id) = save.id else {
        return ValidationSnafu {
            messages: vec!["id is required to update a student".to_string()],
        }
        .fail();
    };

    match save.clone().validate() {
        Ok(draft) => {
            let updated = state
                .store()
                .update(id, draft)
                .await?
                .context(MissingStudentSnafu { id })?;
            info!(id, "Student updated from form");
            Ok(student_card(&updated, true))
        }
        Err(RollbookError::Validation { messages }) => Ok(student_form(&save, &messages)),
        Err(other) => Err(other),
    }
}
