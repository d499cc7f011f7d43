use serde::Deserialize;

pub mod student;
pub mod user;

#[derive(Deserialize)]
pub struct IdForm {
    pub id: i32,
}
