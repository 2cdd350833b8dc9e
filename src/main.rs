use clap::Parser;
use serde_json::Value;
use std::error::Error;
use std::fs;

use talpa::{
    Document, EngineConfig, FieldValue, ImportanceWeight, MemoryStore, SearchEngine, SearchHit,
    SearchOptions, SearchRequest, SortOrder, SortSpec,
};

mod cli;
use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Search {
            input,
            query,
            fields,
            importance,
            skip,
            limit,
            sort,
            json,
        } => run_search(
            &input, &query, fields, &importance, skip, limit, sort.as_deref(), json,
        ),
        Commands::Keywords {
            input,
            fields,
            json,
        } => run_keywords(&input, fields, json),
    };

    if let Err(error) = outcome {
        eprintln!("❌ {error}");
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_search(
    input: &str,
    query: &str,
    fields: Vec<String>,
    importance: &[String],
    skip: Option<usize>,
    limit: Option<usize>,
    sort: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let documents = load_documents(input)?;
    let engine = build_engine(documents, fields)?;

    let request = SearchRequest::new(query)
        .with_options(SearchOptions {
            conditions: Vec::new(),
            sort: sort.map(parse_sort).transpose()?,
            skip,
            limit,
            populate: Vec::new(),
        })
        .with_importance(
            importance
                .iter()
                .map(|spec| parse_importance(spec))
                .collect::<Result<Vec<_>, _>>()?,
        );

    let page = engine.search(&request)?;

    if json {
        let relevance_path = engine.config().relevance_path.clone();
        let results: Vec<Value> = page
            .results
            .iter()
            .map(|hit| hit_to_json(hit, &relevance_path))
            .collect();
        let output = serde_json::json!({
            "results": results,
            "totalCount": page.total_count,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let color = use_color();
    println!(
        "{} result(s) of {} candidate(s)",
        page.results.len(),
        page.total_count
    );
    for (rank, hit) in page.results.iter().enumerate() {
        let id = hit.document.id.as_str();
        if color {
            println!(
                "{:>3}. \x1b[1;36m{}\x1b[0m  \x1b[2mrelevance {:.2}\x1b[0m",
                rank + 1,
                id,
                hit.relevance
            );
        } else {
            println!("{:>3}. {}  relevance {:.2}", rank + 1, id, hit.relevance);
        }
        for (name, value) in &hit.document.fields {
            if let Some(text) = value.searchable_text() {
                println!("     {name}: {text}");
            }
        }
    }
    Ok(())
}

fn run_keywords(input: &str, fields: Vec<String>, json: bool) -> Result<(), Box<dyn Error>> {
    let documents = load_documents(input)?;
    let engine = SearchEngine::new(MemoryStore::new(), EngineConfig::new(fields))?;

    if json {
        let output: Vec<Value> = documents
            .iter()
            .map(|document| {
                serde_json::json!({
                    "id": document.id.as_str(),
                    "keywords": engine.process_keywords(document),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for document in &documents {
        let keywords = engine.process_keywords(document);
        println!("{}: {}", document.id, keywords.join(" "));
    }
    Ok(())
}

/// Seed every document through the save hook so keyword sets are derived,
/// then hand back the ready engine.
fn build_engine(
    documents: Vec<Document>,
    fields: Vec<String>,
) -> Result<SearchEngine<MemoryStore>, Box<dyn Error>> {
    let engine = SearchEngine::new(MemoryStore::new(), EngineConfig::new(fields))?;

    #[cfg(feature = "parallel")]
    let bar = indicatif::ProgressBar::new(documents.len() as u64);

    for document in documents {
        engine.save_document(document)?;
        #[cfg(feature = "parallel")]
        bar.inc(1);
    }

    #[cfg(feature = "parallel")]
    bar.finish_and_clear();

    Ok(engine)
}

/// Parse a JSON array of flat objects into documents. Strings and arrays of
/// scalars become field values; numbers and booleans are stringified;
/// nested objects and nulls are skipped.
fn load_documents(path: &str) -> Result<Vec<Document>, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&raw)?;
    let Value::Array(entries) = parsed else {
        return Err(format!("{path}: expected a JSON array of documents").into());
    };

    let mut documents = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(object) = entry else {
            return Err(format!("{path}: document #{index} is not an object").into());
        };
        let id = match object.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(format!("{path}: document #{index} has no usable id").into()),
        };

        let mut document = Document::new(id);
        for (name, value) in object {
            if name == "id" {
                continue;
            }
            if let Some(field) = field_value(&value) {
                document.set_field(name, field);
            }
        }
        documents.push(document);
    }
    Ok(documents)
}

fn field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::String(text) => Some(FieldValue::Text(text.clone())),
        Value::Number(number) => Some(FieldValue::Text(number.to_string())),
        Value::Bool(flag) => Some(FieldValue::Text(flag.to_string())),
        Value::Array(items) => {
            let texts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Number(number) => Some(number.to_string()),
                    Value::Bool(flag) => Some(flag.to_string()),
                    _ => None,
                })
                .collect();
            Some(FieldValue::TextList(texts))
        }
        _ => None,
    }
}

/// "title:2" → importance weight on `title` with multiplier 2.
fn parse_importance(spec: &str) -> Result<ImportanceWeight, Box<dyn Error>> {
    let (field, multiplier) = spec
        .split_once(':')
        .ok_or_else(|| format!("importance '{spec}' is not field:multiplier"))?;
    let multiplier: f64 = multiplier
        .parse()
        .map_err(|_| format!("importance '{spec}' has a non-numeric multiplier"))?;
    Ok(ImportanceWeight::new(field, multiplier))
}

/// "year" or "year:desc" → native sort specification.
fn parse_sort(spec: &str) -> Result<SortSpec, Box<dyn Error>> {
    match spec.split_once(':') {
        None => Ok(SortSpec::ascending(spec)),
        Some((field, "asc")) => Ok(SortSpec::ascending(field)),
        Some((field, "desc")) => Ok(SortSpec {
            field: field.to_string(),
            order: SortOrder::Descending,
        }),
        Some((_, direction)) => Err(format!("unknown sort direction '{direction}'").into()),
    }
}

fn hit_to_json(hit: &SearchHit, relevance_path: &str) -> Value {
    let mut object = match serde_json::to_value(&hit.document.fields) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    object.insert(
        "id".to_string(),
        Value::String(hit.document.id.to_string()),
    );
    object.insert(relevance_path.to_string(), serde_json::json!(hit.relevance));
    Value::Object(object)
}

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
}
