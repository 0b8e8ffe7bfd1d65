use crate::context::Context;
use crate::{render, snapshot};
use std::path::Path;

pub fn handle(ctx: &Context, file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let records = snapshot::read_records(file)?;
    let cards = ctx.build_cards(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        render::print_table(&cards);
    }

    Ok(())
}
