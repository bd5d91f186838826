//! Non-interactive subcommands. They drive the same store and forms as the
//! terminal catalog, one fetch at a time.

use clap::Subcommand;
use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::RentalApiClient;
use crate::cache::LoadStatus;
use crate::forms::{CarForm, ValidationErrors};
use crate::store::{Resource, SliceStatus, Store};

#[derive(Subcommand, Debug)]
pub enum CliCommand {
  /// Print a resource list as JSON
  List {
    #[arg(value_enum)]
    resource: Resource,
  },
  /// Print one item as JSON
  Show {
    #[arg(value_enum)]
    resource: Resource,
    id: u64,
  },
  /// Add a car from a YAML or JSON file of form fields
  AddCar {
    #[arg(short, long)]
    file: PathBuf,
  },
  /// Update a car; fields missing from the file keep their current values
  UpdateCar {
    #[arg(long)]
    id: u64,
    #[arg(short, long)]
    file: PathBuf,
  },
}

pub async fn run(command: CliCommand, store: &mut Store, client: &RentalApiClient) -> Result<()> {
  match command {
    CliCommand::List { resource } => list(store, resource).await,
    CliCommand::Show { resource, id } => show(store, client, resource, id).await,
    CliCommand::AddCar { file } => add_car(store, client, &file).await,
    CliCommand::UpdateCar { id, file } => update_car(store, client, id, &file).await,
  }
}

async fn list(store: &mut Store, resource: Resource) -> Result<()> {
  let status = fetch_checked(store, resource).await?;

  let json = match resource {
    Resource::Cars => to_json(store.cars().items())?,
    Resource::Models => to_json(store.models().items())?,
    Resource::Colors => to_json(store.colors().items())?,
    Resource::Brands => to_json(store.brands().items())?,
    Resource::Products => to_json(store.products().items())?,
  };
  println!("{}", json);
  match status.last_fetch {
    Some(at) => eprintln!(
      "{} {} ({}, fetched {})",
      status.len,
      resource.name(),
      status.status.label(),
      at.to_rfc3339()
    ),
    None => eprintln!("{} {} ({})", status.len, resource.name(), status.status.label()),
  }
  Ok(())
}

async fn show(store: &mut Store, client: &RentalApiClient, resource: Resource, id: u64) -> Result<()> {
  // Product detail has its own endpoint and bypasses the cache
  if resource == Resource::Products {
    let product = client.get_product(id).await?;
    println!("{}", to_json(&product)?);
    return Ok(());
  }

  fetch_checked(store, resource).await?;
  let json = match resource {
    Resource::Cars => store.cars().get(id).map(to_json),
    Resource::Models => store.models().get(id).map(to_json),
    Resource::Colors => store.colors().get(id).map(to_json),
    Resource::Brands => store.brands().get(id).map(to_json),
    Resource::Products => None,
  };

  match json {
    Some(json) => {
      println!("{}", json?);
      Ok(())
    }
    None => Err(eyre!("No {} with id {}", resource.name(), id)),
  }
}

async fn add_car(store: &mut Store, client: &RentalApiClient, file: &Path) -> Result<()> {
  let form = read_form(file)?;
  load_references(store).await;

  let request = form.validate_add().map_err(invalid)?;
  form
    .check_references(store.models().items(), store.colors().items())
    .map_err(invalid)?;

  client.add_car(&request).await?;
  info!(plate = %request.plate, "car added");
  println!("Added {}", request.plate);

  // The list was not fetched before, so this goes to the network
  store.fetch(Resource::Cars).await;
  if let Some(car) = store.cars().items().iter().find(|c| c.plate == request.plate) {
    println!("{}", to_json(car)?);
  }
  Ok(())
}

async fn update_car(store: &mut Store, client: &RentalApiClient, id: u64, file: &Path) -> Result<()> {
  let edits = read_form(file)?;
  load_references(store).await;
  fetch_checked(store, Resource::Cars).await?;

  let current = store
    .cars()
    .get(id)
    .ok_or_else(|| eyre!("No car with id {}", id))?;
  let form = CarForm::from_car(current).merge(CarForm {
    id: Some(id),
    ..edits
  });

  let request = form.validate_update().map_err(invalid)?;
  form
    .check_references(store.models().items(), store.colors().items())
    .map_err(invalid)?;

  client.update_car(&request).await?;
  info!(id, plate = %request.car.plate, "car updated");
  println!("Updated {}", request.car.plate);

  // Cars were fetched moments ago, so this refresh is served from the cache
  // and cannot show the update; print what was sent instead.
  store.fetch(Resource::Cars).await;
  println!("{}", to_json(&request)?);
  Ok(())
}

/// Fetch a resource and fail when the store ends up in `Error`.
async fn fetch_checked(store: &mut Store, resource: Resource) -> Result<SliceStatus> {
  let status = store.fetch(resource).await;
  if status.status == LoadStatus::Error {
    return Err(eyre!("Failed to fetch {}", resource.name()));
  }
  Ok(status)
}

/// Model and color lists for the reference check. A failed fetch leaves the
/// list empty, which skips the check.
async fn load_references(store: &mut Store) {
  store.fetch(Resource::Models).await;
  store.fetch(Resource::Colors).await;
}

/// YAML reader; JSON documents parse too.
fn read_form(path: &Path) -> Result<CarForm> {
  let contents = std::fs::read_to_string(path)
    .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?;
  serde_yaml::from_str(&contents).map_err(|e| eyre!("Failed to parse {}: {}", path.display(), e))
}

fn invalid(errors: ValidationErrors) -> color_eyre::Report {
  let noun = if errors.len() == 1 { "field" } else { "fields" };
  eyre!("Invalid car ({} {}):\n{}", errors.len(), noun, errors)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::SystemClock;
  use crate::config::ApiConfig;
  use serde_json::json;
  use std::io::Write;
  use std::sync::Arc;
  use wiremock::matchers::{body_partial_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  const VALID_CAR: &str = "plate: 34ABC123\nkilometer: 15000\ndailyPrice: 950\nmodelYear: 2021\n\
                           minFindeksRate: 600\nimagePath: cars/new.png\nmodelId: 2\ncolorId: 1\n";

  fn setup(server: &MockServer) -> (Store, RentalApiClient) {
    let config = ApiConfig {
      url: server.uri(),
      timeout_secs: 5,
    };
    let client = RentalApiClient::new(&config, None).unwrap();
    let store = Store::new(&client, Arc::new(SystemClock), false);
    (store, client)
  }

  async fn mount_references(server: &MockServer) {
    Mock::given(method("GET"))
      .and(path("/models"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "name": "Corolla"}])))
      .mount(server)
      .await;
    Mock::given(method("GET"))
      .and(path("/colors"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Red"}])))
      .mount(server)
      .await;
  }

  fn write_form(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("rentacar-{}-{}.yaml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[tokio::test]
  async fn test_add_car_posts_then_refetches_cars() {
    let server = MockServer::start().await;
    mount_references(&server).await;
    Mock::given(method("POST"))
      .and(path("/cars"))
      .and(body_partial_json(json!({"plate": "34ABC123", "modelId": 2, "available": "YES"})))
      .respond_with(ResponseTemplate::new(201))
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/cars"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 9, "plate": "34ABC123"}])))
      .expect(1)
      .mount(&server)
      .await;

    let (mut store, client) = setup(&server);
    let file = write_form("add-valid", VALID_CAR);
    add_car(&mut store, &client, &file).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let calls: Vec<(String, String)> = requests
      .iter()
      .map(|r| (r.method.to_string(), r.url.path().to_string()))
      .collect();
    let post = calls.iter().position(|c| c.0 == "POST").unwrap();
    assert_eq!(calls[post + 1], ("GET".to_string(), "/cars".to_string()));
    assert_eq!(store.cars().get(9).map(|c| c.plate.as_str()), Some("34ABC123"));

    let _ = std::fs::remove_file(file);
  }

  #[tokio::test]
  async fn test_invalid_form_never_reaches_the_api() {
    let server = MockServer::start().await;
    mount_references(&server).await;
    Mock::given(method("POST"))
      .and(path("/cars"))
      .respond_with(ResponseTemplate::new(201))
      .expect(0)
      .mount(&server)
      .await;

    let (mut store, client) = setup(&server);
    let file = write_form("add-invalid", "plate: ABC\nmodelYear: 1999\n");
    let err = add_car(&mut store, &client, &file).await.unwrap_err();

    assert!(err.to_string().contains("Invalid car"), "{}", err);
    assert_eq!(store.cars().status(), LoadStatus::Initial);

    let _ = std::fs::remove_file(file);
  }

  #[tokio::test]
  async fn test_unknown_model_is_rejected_when_models_loaded() {
    let server = MockServer::start().await;
    mount_references(&server).await;
    Mock::given(method("POST"))
      .and(path("/cars"))
      .respond_with(ResponseTemplate::new(201))
      .expect(0)
      .mount(&server)
      .await;

    let (mut store, client) = setup(&server);
    let file = write_form("add-unknown-model", &VALID_CAR.replace("modelId: 2", "modelId: 9"));
    let err = add_car(&mut store, &client, &file).await.unwrap_err();

    assert!(err.to_string().contains("Unknown model 9"), "{}", err);

    let _ = std::fs::remove_file(file);
  }

  #[tokio::test]
  async fn test_update_car_puts_file_merged_over_current_car() {
    let server = MockServer::start().await;
    mount_references(&server).await;
    Mock::given(method("GET"))
      .and(path("/cars"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
        "id": 7, "plate": "34ABC123", "kilometer": 100, "dailyPrice": 500.0,
        "modelYear": 2019, "minFindeksRate": 400, "imagePath": "cars/7.png",
        "modelId": 2, "colorId": 1, "available": "YES"
      }])))
      // The refresh after the PUT is still inside the window
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(method("PUT"))
      .and(path("/cars"))
      .and(body_partial_json(json!({
        "id": 7,
        "plate": "34ABC123",
        "kilometer": 100,
        "dailyPrice": 650.0,
        "modelId": 2,
        "available": "YES"
      })))
      .respond_with(ResponseTemplate::new(200))
      .expect(1)
      .mount(&server)
      .await;

    let (mut store, client) = setup(&server);
    let file = write_form("update", "dailyPrice: 650\n");
    update_car(&mut store, &client, 7, &file).await.unwrap();

    let _ = std::fs::remove_file(file);
  }

  #[tokio::test]
  async fn test_update_unknown_car() {
    let server = MockServer::start().await;
    mount_references(&server).await;
    Mock::given(method("GET"))
      .and(path("/cars"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
      .mount(&server)
      .await;

    let (mut store, client) = setup(&server);
    let file = write_form("update-missing", "dailyPrice: 650\n");
    let err = update_car(&mut store, &client, 7, &file).await.unwrap_err();
    assert!(err.to_string().contains("No car with id 7"));

    let _ = std::fs::remove_file(file);
  }

  #[test]
  fn test_read_form_accepts_yaml_and_json() {
    let dir = std::env::temp_dir();

    let yaml_path = dir.join(format!("rentacar-form-{}.yaml", std::process::id()));
    std::fs::File::create(&yaml_path)
      .unwrap()
      .write_all(b"plate: 34ABC123\nmodelYear: 2020\ncarType: SUV\n")
      .unwrap();
    let form = read_form(&yaml_path).unwrap();
    assert_eq!(form.plate.as_deref(), Some("34ABC123"));
    assert_eq!(form.model_year, Some(2020));

    let json_path = dir.join(format!("rentacar-form-{}.json", std::process::id()));
    std::fs::File::create(&json_path)
      .unwrap()
      .write_all(br#"{"kilometer": 1200, "colorId": 3}"#)
      .unwrap();
    let form = read_form(&json_path).unwrap();
    assert_eq!(form.kilometer, Some(1200));
    assert_eq!(form.color_id, Some(3));
    assert_eq!(form.plate, None);

    let _ = std::fs::remove_file(yaml_path);
    let _ = std::fs::remove_file(json_path);
  }

  #[test]
  fn test_read_form_missing_file() {
    let err = read_form(Path::new("/nonexistent/rentacar-form.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
  }
}
