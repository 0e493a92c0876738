use crate::domain::models::JsonOut;
use serde::Serialize;

fn emit_json<T: Serialize>(ok: bool, data: T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok, data })?
    );
    Ok(())
}

/// List-shaped results: one text row per item, or the whole slice enveloped.
pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        return emit_json(true, data);
    }
    for d in data {
        println!("{}", row(d));
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    line: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        return emit_json(true, data);
    }
    println!("{}", line(&data));
    Ok(())
}

/// Like `print_one`, but the caller decides the envelope's `ok` flag.
/// Used by reports that signal failure through their payload.
pub fn print_flagged<T: Serialize>(
    json: bool,
    ok: bool,
    data: T,
    line: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        return emit_json(ok, data);
    }
    println!("{}", line(&data));
    Ok(())
}
