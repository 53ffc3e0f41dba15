use std::io::Write;

use colored::Colorize;
use hbnb_store::{Backend, ObjectStore, StoreError};
use hbnb_types::{ModelKind, Record};

use crate::cli::*;

pub fn run_command<B: Backend>(
    store: &mut ObjectStore<B>,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Create(args) => cmd_create(store, args, out),
        Command::Show(args) => cmd_show(store, args, out),
        Command::Destroy(args) => cmd_destroy(store, args, out),
        Command::All(args) => cmd_all(store, args, out),
        Command::Update(args) => cmd_update(store, args, out),
        Command::Count(args) => cmd_count(store, args, out),
    }
}

fn cmd_create<B: Backend>(
    store: &mut ObjectStore<B>,
    args: ModelArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let kind: ModelKind = args
        .model
        .parse()
        .map_err(|_| StoreError::ModelNotFound { model: args.model.clone() })?;
    let record = Record::new(kind);
    let id = record.id().to_string();
    store.put(record);
    store.save()?;
    writeln!(out, "{id}")?;
    Ok(())
}

fn cmd_show<B: Backend>(
    store: &mut ObjectStore<B>,
    args: InstanceArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let record = store.find_by_id(&args.model, &args.id)?;
    writeln!(out, "{record}")?;
    Ok(())
}

fn cmd_destroy<B: Backend>(
    store: &mut ObjectStore<B>,
    args: InstanceArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    store.delete_by_id(&args.model, &args.id)?;
    writeln!(out, "{} Deleted {}.{}", "✓".green(), args.model, args.id.yellow())?;
    Ok(())
}

fn cmd_all<B: Backend>(
    store: &mut ObjectStore<B>,
    args: AllArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let lines = store.find_all(args.model.as_deref().unwrap_or(""))?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn cmd_update<B: Backend>(
    store: &mut ObjectStore<B>,
    args: UpdateArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    store.update_field(&args.model, &args.id, &args.field, args.value.as_str())?;
    writeln!(
        out,
        "{} Updated {}.{} {}",
        "✓".green(),
        args.model,
        args.id.yellow(),
        args.field.bold()
    )?;
    Ok(())
}

fn cmd_count<B: Backend>(
    store: &mut ObjectStore<B>,
    args: ModelArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "{}", store.count(&args.model)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbnb_store::InMemoryBackend;
    use hbnb_types::FieldValue;

    fn run(store: &mut ObjectStore<InMemoryBackend>, command: Command) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run_command(store, command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn create(store: &mut ObjectStore<InMemoryBackend>, model: &str) -> String {
        let out = run(store, Command::Create(ModelArgs { model: model.into() })).unwrap();
        out.trim().to_string()
    }

    #[test]
    fn create_saves_and_prints_id() {
        let mut store = ObjectStore::new(InMemoryBackend::new());
        let id = create(&mut store, "User");
        assert!(store.find_by_id("User", &id).is_ok());
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn create_unknown_model_fails() {
        let mut store = ObjectStore::new(InMemoryBackend::new());
        let err = run(&mut store, Command::Create(ModelArgs { model: "Ghost".into() })).unwrap_err();
        assert_eq!(err.to_string(), "Model with name Ghost is not registered!");
        assert!(store.is_empty());
    }

    #[test]
    fn show_prints_record() {
        let mut store = ObjectStore::new(InMemoryBackend::new());
        let id = create(&mut store, "City");
        let out = run(
            &mut store,
            Command::Show(InstanceArgs { model: "City".into(), id: id.clone() }),
        )
        .unwrap();
        assert!(out.starts_with(&format!("[City] ({id})")));
    }

    #[test]
    fn show_missing_instance_reports_store_error() {
        let mut store = ObjectStore::new(InMemoryBackend::new());
        let err = run(
            &mut store,
            Command::Show(InstanceArgs { model: "City".into(), id: "nope".into() }),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Instance of City with id nope does not exist!");
    }

    #[test]
    fn destroy_removes_instance() {
        let mut store = ObjectStore::new(InMemoryBackend::new());
        let id = create(&mut store, "Review");
        run(
            &mut store,
            Command::Destroy(InstanceArgs { model: "Review".into(), id: id.clone() }),
        )
        .unwrap();
        assert!(store.find_by_id("Review", &id).is_err());
    }

    #[test]
    fn all_lists_one_line_per_record() {
        let mut store = ObjectStore::new(InMemoryBackend::new());
        create(&mut store, "User");
        create(&mut store, "User");
        create(&mut store, "State");

        let every = run(&mut store, Command::All(AllArgs { model: None })).unwrap();
        assert_eq!(every.lines().count(), 3);
        let users = run(&mut store, Command::All(AllArgs { model: Some("User".into()) })).unwrap();
        assert_eq!(users.lines().count(), 2);
    }

    #[test]
    fn update_sets_field_from_text() {
        let mut store = ObjectStore::new(InMemoryBackend::new());
        let id = create(&mut store, "Place");
        run(
            &mut store,
            Command::Update(UpdateArgs {
                model: "Place".into(),
                id: id.clone(),
                field: "max_guest".into(),
                value: "6".into(),
            }),
        )
        .unwrap();
        let record = store.find_by_id("Place", &id).unwrap();
        assert_eq!(record.field("max_guest"), Some(&FieldValue::Int(6)));
    }

    #[test]
    fn count_prints_number() {
        let mut store = ObjectStore::new(InMemoryBackend::new());
        create(&mut store, "Amenity");
        create(&mut store, "Amenity");
        let out = run(&mut store, Command::Count(ModelArgs { model: "Amenity".into() })).unwrap();
        assert_eq!(out.trim(), "2");
    }
}
