use crate::data::user::User;
use maud::{Markup, Render, html};

pub fn render_table<const N: usize>(
    overall_title: &'static str,
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
) -> Markup {
    html! {
        div class="container mx-auto" {
            (title(overall_title))
            div class="overflow-x-auto" {
                table class="min-w-full bg-gray-800 rounded shadow-md" {
                    thead class="bg-gray-700" {
                        tr {
                            @for title in titles {
                                th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                            }
                        }
                    }
                    tbody {
                        @for row in items {
                            tr {
                                @for col in row {
                                    td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mb-2" {(s)}
    }
}

pub fn form_element(name: &'static str, label: &'static str, inner: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(name) class="block text-gray-300 text-sm font-bold mb-2" {(label)}
            (inner)
        }
    }
}

pub fn simple_form_element(
    name: &'static str,
    label: &'static str,
    required: bool,
    input_type: Option<&'static str>,
    value: Option<&str>,
) -> Markup {
    form_element(
        name,
        label,
        html! {
            input type=(input_type.unwrap_or("text")) id=(name) name=(name) required[required] value=[value] class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
        },
    )
}

pub fn form_submit_button(text: Option<&'static str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Submit"))
            }
        }
    }
}

pub fn render_nav(user: Option<&User>) -> Markup {
    html! {
        nav class="w-full bg-gray-800 p-4 mb-8 flex flex-row items-center justify-between" {
            div class="flex flex-row space-x-4" {
                a href="/" class="font-bold hover:underline" {"Rollbook"}
                a href="/students" class="hover:underline" {"Students"}
            }
            div class="flex flex-row items-center space-x-4" {
                @if let Some(user) = user {
                    span class="text-gray-400 text-sm" {(user.email.as_str())}
                    form method="post" action="/logout" {
                        button type="submit" class="hover:underline" {"Logout"}
                    }
                } @else {
                    a href="/login" class="hover:underline" {"Login"}
                }
            }
        }
    }
}

pub struct Email<'a>(pub &'a str);

impl Render for Email<'_> {
    fn render(&self) -> Markup {
        html! {
            a href={"mailto:" (self.0)} target="_blank" class="text-blue-200 underline" {(self.0)}
        }
    }
}
