use crate::context::Context;
use crate::{render, snapshot};
use dflow_core::{ServerCard, find_server};
use std::path::Path;

pub fn handle(
    ctx: &Context,
    file: Option<&Path>,
    server: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let records = snapshot::read_records(file)?;

    let cards = match server {
        Some(key) => {
            let record = find_server(&records, key)?;
            vec![ServerCard::from_record(record, &ctx.classifier, &ctx.cards)]
        }
        None => ctx.build_cards(&records),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            println!();
        }
        render::print_card(card);
    }

    Ok(())
}
