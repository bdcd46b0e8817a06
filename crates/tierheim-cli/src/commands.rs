//! Subcommand handlers: translate parsed arguments into registry calls and
//! print the results.

use serde::Serialize;
use serde_json::json;
use tierheim_core::{
  AdmissionRegistry,
  age::Clock,
  animal::{AnimalId, AnimalView, NewAnimal},
  enclosure::{EnclosureId, EnclosureRecord},
};
use tierheim_store_sqlite::SqliteStore;

use crate::{AdmitArgs, Command, EnclosureCommand};

pub async fn run<C: Clock>(
  registry: &AdmissionRegistry<SqliteStore, C>,
  command: Command,
  json: bool,
) -> anyhow::Result<()> {
  match command {
    Command::Admit(args) => {
      let id = registry.admit(candidate(args)).await?;
      emit(json, &json!({ "id": id }), || format!("admitted animal {id}"))
    }

    Command::List => {
      let animals = registry.find_all().await?;
      emit(json, &animals, || {
        animals.iter().map(animal_line).collect::<Vec<_>>().join("\n")
      })
    }

    Command::Show { id } => match registry.find(AnimalId(id)).await? {
      Some(view) => emit(json, &view, || animal_line(&view)),
      None => anyhow::bail!("animal not found: {id}"),
    },

    Command::Remove { id } => {
      registry.remove(AnimalId(id)).await?;
      emit(json, &json!({ "removed": id }), || format!("removed animal {id}"))
    }

    Command::Count { enclosure: Some(id) } => {
      let count = registry.count_in_enclosure(EnclosureId(id)).await?;
      emit(json, &json!({ "enclosure": id, "count": count }), || count.to_string())
    }
    Command::Count { enclosure: None } => {
      let count = registry.total_count().await?;
      emit(json, &json!({ "count": count }), || count.to_string())
    }

    Command::Enclosure(EnclosureCommand::Add { id, name, capacity }) => {
      let enclosure = EnclosureRecord { id: EnclosureId(id), name, capacity };
      registry.store().provision_enclosure(enclosure.clone()).await?;
      tracing::info!(id, capacity, "enclosure provisioned");
      emit(json, &enclosure, || format!("registered enclosure {id}"))
    }

    Command::Enclosure(EnclosureCommand::List) => {
      let enclosures = registry.list_enclosures().await?;
      emit(json, &enclosures, || {
        enclosures
          .iter()
          .map(ToString::to_string)
          .collect::<Vec<_>>()
          .join("\n")
      })
    }

    Command::Enclosure(EnclosureCommand::Check { id }) => {
      let status = registry.enclosure_status(EnclosureId(id)).await?;
      emit(json, &status, || {
        if status.has_space() {
          format!("{status}\n{} slot(s) free", status.free_slots())
        } else {
          format!("{status}\nFULL")
        }
      })
    }
  }
}

fn candidate(args: AdmitArgs) -> NewAnimal {
  NewAnimal {
    name:         args.name,
    species:      args.species,
    birth_date:   args.birth_date,
    age:          args.age,
    enclosure_id: args.enclosure.map(EnclosureId),
    sex:          args.sex,
    color:        args.color,
    health_note:  args.health_note,
    arrival_date: args.arrival_date,
  }
}

fn emit<T: Serialize>(
  json: bool,
  value: &T,
  human: impl FnOnce() -> String,
) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(value)?);
  } else {
    let text = human();
    if !text.is_empty() {
      println!("{text}");
    }
  }
  Ok(())
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
  value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

/// One listing row: id, name, species, age, enclosure, sex, color.
fn animal_line(view: &AnimalView) -> String {
  let r = &view.record;
  format!(
    "{:>5}  {:<16} {:<12} {:>3}  {:>5}  {}  {}",
    r.id,
    r.name,
    r.species,
    or_dash(view.age),
    or_dash(r.enclosure_id),
    r.sex,
    r.color.as_deref().unwrap_or("-"),
  )
}
