use actix_cors::Cors;
use actix_web::{get, post, web, App, HttpResponse, HttpServer};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod balance;
mod schemas;
mod store;
mod validate;

use balance::{compute_balances, total_expenses, BalanceSummary};
use schemas::{ExpenseInput, Group, MemberName};
use store::GroupStore;
use validate::{build_expense, check_new_group};

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

fn error_body(message: impl Into<String>) -> ErrorBody {
    ErrorBody {
        message: message.into(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewGroupJson {
    group_name: String,
    members: Vec<MemberName>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryJson {
    total_expenses: f64,
    #[serde(flatten)]
    summary: BalanceSummary,
}

#[post("/api/groups")]
async fn create_group(store: web::Data<GroupStore>, json: web::Json<NewGroupJson>) -> HttpResponse {
    let json = json.into_inner();
    if let Err(err) = check_new_group(&json.group_name, &json.members) {
        return HttpResponse::BadRequest().json(error_body(err.to_string()));
    }
    let group = Group {
        id: bson::oid::ObjectId::new().to_hex(),
        group_name: json.group_name,
        members: json.members,
        expenses: vec![],
    };
    match store.insert_group(&group).await {
        Ok(()) => {
            info!(group = %group.id, "created group");
            HttpResponse::Created().json(group)
        }
        Err(err) => {
            error!("failed to insert group: {err}");
            HttpResponse::InternalServerError().json(error_body(err.to_string()))
        }
    }
}

#[get("/api/groups")]
async fn list_groups(store: web::Data<GroupStore>) -> HttpResponse {
    match store.list_groups().await {
        Ok(listings) => HttpResponse::Ok().json(listings),
        Err(err) => {
            error!("failed to list groups: {err}");
            HttpResponse::InternalServerError().json(error_body(err.to_string()))
        }
    }
}

#[get("/api/groups/{id}")]
async fn get_group(store: web::Data<GroupStore>, id: web::Path<String>) -> HttpResponse {
    match store.find_group(&id).await {
        Ok(Some(group)) => HttpResponse::Ok().json(group),
        Ok(None) => HttpResponse::NotFound().json(error_body("Couldn't find the desired group")),
        Err(err) => {
            error!("failed to read group: {err}");
            HttpResponse::InternalServerError().json(error_body(err.to_string()))
        }
    }
}

#[post("/api/groups/{id}/expenses")]
async fn add_expense(
    store: web::Data<GroupStore>,
    id: web::Path<String>,
    input: web::Json<ExpenseInput>,
) -> HttpResponse {
    let id = id.into_inner();
    let group = match store.find_group(&id).await {
        Ok(Some(group)) => group,
        Ok(None) => {
            return HttpResponse::NotFound().json(error_body("Couldn't find the desired group"))
        }
        Err(err) => {
            error!("failed to read group: {err}");
            return HttpResponse::InternalServerError().json(error_body(err.to_string()));
        }
    };
    let expense = match build_expense(&group.members, input.into_inner()) {
        Ok(expense) => expense,
        Err(err) => return HttpResponse::BadRequest().json(error_body(err.to_string())),
    };
    match store.append_expense(&id, &expense).await {
        Ok(Some(updated)) => {
            info!(group = %id, amount = expense.amount, "added expense");
            HttpResponse::Ok().json(updated)
        }
        Ok(None) => HttpResponse::NotFound().json(error_body("Couldn't find the desired group")),
        Err(err) => {
            error!("failed to append expense: {err}");
            HttpResponse::InternalServerError().json(error_body(err.to_string()))
        }
    }
}

#[get("/api/groups/{id}/summary")]
async fn get_summary(store: web::Data<GroupStore>, id: web::Path<String>) -> HttpResponse {
    match store.find_group(&id).await {
        Ok(Some(group)) => HttpResponse::Ok().json(SummaryJson {
            total_expenses: total_expenses(&group.expenses),
            summary: compute_balances(&group.members, &group.expenses),
        }),
        Ok(None) => HttpResponse::NotFound().json(error_body("Couldn't find the desired group")),
        Err(err) => {
            error!("failed to read group: {err}");
            HttpResponse::InternalServerError().json(error_body(err.to_string()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let uri = std::env::var("MONGODB_URI").expect("You need to add the MONGODB_URI to the env");
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let client = Client::with_uri_str(uri).await.expect("failed to connect");
    info!("connected to MongoDB");

    let store = GroupStore::new(&client);

    info!(port, "starting server");
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(store.clone()))
            .service(create_group)
            .service(list_groups)
            .service(get_group)
            .service(add_expense)
            .service(get_summary)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
