//! `flip lenses` and `flip topics`: the static registries.

use anyhow::Result;
use serde::Serialize;

use flipside_core::lens::{list_lenses, Lens};
use flipside_core::topics::list_topics;

use crate::display::print_json;

#[derive(Debug, Serialize)]
pub struct LensInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub instruction: &'static str,
}

impl From<Lens> for LensInfo {
    fn from(lens: Lens) -> Self {
        Self {
            id: lens.id(),
            label: lens.label(),
            icon: lens.icon(),
            instruction: lens.instruction(),
        }
    }
}

pub fn run_lenses(json: bool) -> Result<()> {
    let lenses: Vec<LensInfo> = list_lenses().into_iter().map(LensInfo::from).collect();
    if json {
        return print_json(&lenses);
    }
    for info in &lenses {
        println!("{} {:<9} {}", info.icon, info.id, info.label);
    }
    Ok(())
}

pub fn run_topics(json: bool) -> Result<()> {
    let topics = list_topics();
    if json {
        return print_json(topics);
    }
    for topic in topics {
        println!("{}  {}", topic.id, topic.label);
    }
    Ok(())
}
