//! Feature demonstrations grouped by edition.
//!
//! Each edition module exposes `examples()`, the ordered list of its examples.
//! Examples are plain `fn() -> Check` functions named after the feature they
//! show.

use serde::{Deserialize, Serialize};

use crate::runner::Group;

pub mod edition2015;
pub mod edition2018;
pub mod edition2021;
pub mod edition2024;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, clap::ValueEnum,
)]
pub enum Era {
    #[serde(rename = "2015")]
    #[value(name = "2015")]
    Rust2015,
    #[serde(rename = "2018")]
    #[value(name = "2018")]
    Rust2018,
    #[serde(rename = "2021")]
    #[value(name = "2021")]
    Rust2021,
    #[serde(rename = "2024")]
    #[value(name = "2024")]
    Rust2024,
}

impl Era {
    pub const ALL: [Era; 4] = [Era::Rust2015, Era::Rust2018, Era::Rust2021, Era::Rust2024];

    pub fn year(self) -> u16 {
        match self {
            Era::Rust2015 => 2015,
            Era::Rust2018 => 2018,
            Era::Rust2021 => 2021,
            Era::Rust2024 => 2024,
        }
    }

    pub fn banner(self) -> String {
        format!("Rust {} features runnable tests:", self.year())
    }

    pub fn group(self) -> Group {
        let examples = match self {
            Era::Rust2015 => edition2015::examples(),
            Era::Rust2018 => edition2018::examples(),
            Era::Rust2021 => edition2021::examples(),
            Era::Rust2024 => edition2024::examples(),
        };
        Group::new(self.banner(), examples)
    }
}

/// Groups for `eras`, in the given order.
pub fn groups(eras: &[Era]) -> Vec<Group> {
    eras.iter().map(|era| era.group()).collect()
}
