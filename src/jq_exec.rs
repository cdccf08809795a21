//! jq pre-selection of schema documents, e.g. `.components.schemas.User`
//! out of an OpenAPI file.
use anyhow::{Context, Result, anyhow};
use jaq_core::{load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` against `input` and return every output as JSON.
pub fn select_with_jq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader.load(&arena, program).map_err(|errs| {
        let problems = errs.into_iter().map(|(_, err)| format!("parse error: {err:?}"));
        rejected_filter(filter_src, problems)
    })?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errs| {
            let problems = errs
                .into_iter()
                .flat_map(|(_, undefined)| undefined)
                .map(|(name, undef)| format!("undefined `{name}`: {undef:?}"));
            rejected_filter(filter_src, problems)
        })?;

    let inputs = RcIter::new(core::iter::empty());
    let mut it = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    while let Some(item) = it.next() {
        let val = item.map_err(|e| anyhow!("jq evaluation failed: {e:?}"))?;
        // Val's Display is JSON text
        let text = val.to_string();
        let value = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("jq produced a non-JSON value: {text}"))?;
        out.push(value);
    }
    Ok(out)
}

/// One error listing every problem the loader or compiler found in the filter.
fn rejected_filter(filter_src: &str, problems: impl Iterator<Item = String>) -> anyhow::Error {
    let problems = problems.collect::<Vec<_>>().join("; ");
    anyhow!("jq filter `{filter_src}` rejected: {problems}")
}
