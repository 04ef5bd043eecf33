//! JSON API over the contact store.
//!
//! | Route                       | Store operation |
//! |-----------------------------|-----------------|
//! | `POST   /api/people`        | create          |
//! | `GET    /api/people`        | list            |
//! | `GET    /api/people/{id}`   | get             |
//! | `PATCH  /api/people/{id}`   | update          |
//! | `DELETE /api/people/{id}`   | delete          |
//!
//! Bodies are form-encoded (`name`, `email`, `age`), or JSON with the same
//! keys when the request says `content-type: application/json`. Every
//! failure is answered with `{"status":"error","error":"…"}`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::contact::{Contact, ContactError, ContactFields, ContactId, ContactPatch};
use crate::handler::Handler;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::ContactStore;

/// Message for any request under `/api` that names no known operation.
pub const NOT_UNDERSTOOD: &str = "didn't understand request";

// ── Errors ────────────────────────────────────────────────────────────────────

/// Everything an API call can fail with.
#[derive(Debug)]
pub enum ApiError {
    Contact(ContactError),
    /// Unknown method/path under `/api`, or an `{id}` that is not a number.
    Routing,
    /// The store lock was poisoned by a panicking request.
    Internal(String),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            // Unknown ids share the validation status; see DESIGN.md.
            Self::Contact(_) | Self::Routing => Status::BadRequest,
            Self::Internal(_)                => Status::InternalServerError,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contact(e)  => write!(f, "{e}"),
            Self::Routing     => f.write_str(NOT_UNDERSTOOD),
            Self::Internal(_) => f.write_str("internal error"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Contact(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(e: ContactError) -> Self {
        Self::Contact(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!("api failure: {detail}");
        }
        let body = ErrorBody { status: "error", error: self.to_string() };
        match serde_json::to_vec(&body) {
            Ok(bytes) => Response::builder().status(self.status()).json(bytes),
            Err(_) => Response::status(Status::InternalServerError),
        }
    }
}

// ── Success bodies ────────────────────────────────────────────────────────────

/// `{"status":"ok"}`
#[derive(Debug, Serialize)]
pub struct Ack {
    pub status: &'static str,
}

const OK: Ack = Ack { status: "ok" };

/// `{"status":"ok","id":…}`
#[derive(Debug, Serialize)]
pub struct Created {
    pub status: &'static str,
    pub id: ContactId,
}

// ── Request bodies ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct JsonFields {
    name: Option<String>,
    email: Option<String>,
    age: Option<serde_json::Value>,
}

/// Reads `name`, `email` and `age` from the body; absent keys stay `None`.
fn read_fields(req: &Request) -> Result<ContactPatch, ContactError> {
    if req.is_json() {
        let fields: JsonFields = serde_json::from_slice(req.body())
            .map_err(|e| ContactError::Validation(format!("invalid JSON body: {e}")))?;
        let age = fields.age.and_then(|age| match age {
            serde_json::Value::Null      => None,
            serde_json::Value::String(s) => Some(s),
            other                        => Some(other.to_string()),
        });
        return Ok(ContactPatch { name: fields.name, email: fields.email, age });
    }

    let mut form = req.form();
    Ok(ContactPatch {
        name: form.remove("name"),
        email: form.remove("email"),
        age: form.remove("age"),
    })
}

fn id_param(req: &Request) -> Result<ContactId, ApiError> {
    req.param("id")
        .and_then(|raw| raw.parse().ok())
        .ok_or(ApiError::Routing)
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Owns the process's contact store and answers API calls against it.
///
/// Built once at startup and shared with every route as an `Arc<Api>`.
#[derive(Debug, Default)]
pub struct Api {
    store: Mutex<ContactStore>,
}

impl Api {
    pub fn new(store: ContactStore) -> Self {
        Self { store: Mutex::new(store) }
    }

    fn store(&self) -> Result<MutexGuard<'_, ContactStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("contact store lock poisoned".to_owned()))
    }

    /// `POST /api/people`
    pub fn create(&self, req: &Request) -> Result<Json<Created>, ApiError> {
        let patch = read_fields(req)?;
        let fields = ContactFields {
            name: patch.name.unwrap_or_default(),
            email: patch.email.unwrap_or_default(),
            age: patch.age.unwrap_or_default(),
        };
        let id = self.store()?.create(fields)?;
        Ok(Json(Created { status: "ok", id }))
    }

    /// `GET /api/people`
    ///
    /// Ids are dense from 0, so position `i` of the array is contact `i`,
    /// with `null` where a contact was deleted.
    pub fn list(&self, _req: &Request) -> Result<Json<Vec<Option<Contact>>>, ApiError> {
        let store = self.store()?;
        Ok(Json(store.list().map(|(_, slot)| slot.cloned()).collect()))
    }

    /// `GET /api/people/{id}`
    pub fn get(&self, req: &Request) -> Result<Json<Contact>, ApiError> {
        let id = id_param(req)?;
        Ok(Json(self.store()?.get(id)?.clone()))
    }

    /// `PATCH /api/people/{id}`
    pub fn update(&self, req: &Request) -> Result<Json<Ack>, ApiError> {
        let id = id_param(req)?;
        let patch = read_fields(req)?;
        self.store()?.update(id, patch)?;
        Ok(Json(OK))
    }

    /// `DELETE /api/people/{id}`
    pub fn delete(&self, req: &Request) -> Result<Json<Ack>, ApiError> {
        let id = id_param(req)?;
        self.store()?.delete(id)?;
        Ok(Json(OK))
    }
}

/// Adapts an [`Api`] method into a route handler sharing `api`.
fn bind<F, R>(api: Arc<Api>, op: F) -> impl Handler
where
    F: Fn(&Api, &Request) -> R + Send + Sync + 'static,
    R: IntoResponse + 'static,
{
    move |req: Request| {
        let res = op(&*api, &req).into_response();
        async move { res }
    }
}

/// Registers every `/api/people` route on `router`.
pub fn routes(router: Router, api: Arc<Api>) -> Router {
    router
        .post("/api/people", bind(Arc::clone(&api), Api::create))
        .get("/api/people", bind(Arc::clone(&api), Api::list))
        .get("/api/people/{id}", bind(Arc::clone(&api), Api::get))
        .patch("/api/people/{id}", bind(Arc::clone(&api), Api::update))
        .delete("/api/people/{id}", bind(api, Api::delete))
}

/// True for paths the API owns, whether or not a route matches them.
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use http::HeaderMap;
    use serde_json::{Value, json};

    use super::*;

    fn form(method: http::Method, path: &str, id: Option<&str>, body: &str) -> Request {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/x-www-form-urlencoded".parse().unwrap());
        let params: HashMap<String, String> = id
            .map(|id| [("id".to_owned(), id.to_owned())].into_iter().collect())
            .unwrap_or_default();
        Request::new(method, path, headers, Bytes::from(body.to_owned()), params)
    }

    fn json_req(method: http::Method, id: Option<&str>, body: Value) -> Request {
        let mut req = form(method, "/api/people", id, "");
        req.headers.insert("content-type", "application/json".parse().unwrap());
        req.body = Bytes::from(body.to_string());
        req
    }

    fn body(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    fn create(api: &Api, body: &str) -> Response {
        api.create(&form(http::Method::POST, "/api/people", None, body)).into_response()
    }

    #[test]
    fn create_returns_the_new_id() {
        let api = Api::default();
        let res = create(&api, "name=Alice&email=a%40x.com&age=30");
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(body(&res), json!({ "status": "ok", "id": 0 }));

        let res = create(&api, "name=Bob&email=b%40x.com&age=40");
        assert_eq!(body(&res), json!({ "status": "ok", "id": 1 }));
    }

    #[test]
    fn create_with_bad_age_is_a_400_and_stores_nothing() {
        let api = Api::default();
        let res = create(&api, "name=Alice&email=a%40x.com&age=thirty");
        assert_eq!(res.status_code(), Status::BadRequest);
        assert_eq!(body(&res), json!({ "status": "error", "error": "age must be a number" }));

        let res = create(&api, "name=Alice&email=a%40x.com");
        assert_eq!(res.status_code(), Status::BadRequest);

        let list = api.list(&form(http::Method::GET, "/api/people", None, "")).into_response();
        assert_eq!(body(&list), json!([]));
    }

    #[test]
    fn list_keeps_positions_after_delete() {
        let api = Api::default();
        create(&api, "name=Alice&email=a%40x.com&age=30");
        create(&api, "name=Bob&email=b%40x.com&age=40");

        let res = api.delete(&form(http::Method::DELETE, "/api/people/0", Some("0"), "")).into_response();
        assert_eq!(body(&res), json!({ "status": "ok" }));

        let res = api.list(&form(http::Method::GET, "/api/people", None, "")).into_response();
        assert_eq!(
            body(&res),
            json!([null, { "id": 1, "name": "Bob", "email": "b@x.com", "age": 40 }]),
        );
    }

    #[test]
    fn patch_updates_in_place() {
        let api = Api::default();
        create(&api, "name=Alice&email=a%40x.com&age=30");
        create(&api, "name=Bob&email=b%40x.com&age=40");
        api.delete(&form(http::Method::DELETE, "/api/people/0", Some("0"), "")).into_response();

        let res = api
            .update(&form(http::Method::PATCH, "/api/people/1", Some("1"), "name=Bob&email=b%40x.com&age=41"))
            .into_response();
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(body(&res), json!({ "status": "ok" }));

        let res = api.get(&form(http::Method::GET, "/api/people/1", Some("1"), "")).into_response();
        assert_eq!(body(&res), json!({ "id": 1, "name": "Bob", "email": "b@x.com", "age": 41 }));
    }

    #[test]
    fn unknown_ids_are_reported_as_errors() {
        let api = Api::default();
        let res = api
            .update(&form(http::Method::PATCH, "/api/people/9", Some("9"), "age=3"))
            .into_response();
        assert_eq!(res.status_code(), Status::BadRequest);
        assert_eq!(body(&res), json!({ "status": "error", "error": "no contact with id 9" }));

        let res = api.delete(&form(http::Method::DELETE, "/api/people/9", Some("9"), "")).into_response();
        assert_eq!(res.status_code(), Status::BadRequest);
    }

    #[test]
    fn non_numeric_ids_are_not_understood() {
        let api = Api::default();
        let res = api.get(&form(http::Method::GET, "/api/people/bob", Some("bob"), "")).into_response();
        assert_eq!(body(&res), json!({ "status": "error", "error": NOT_UNDERSTOOD }));
    }

    #[test]
    fn accepts_json_bodies_with_numeric_age() {
        let api = Api::default();
        let res = api
            .create(&json_req(http::Method::POST, None, json!({ "name": "Ada", "email": "ada@x.com", "age": 36 })))
            .into_response();
        assert_eq!(body(&res), json!({ "status": "ok", "id": 0 }));

        let res = api
            .update(&json_req(http::Method::PATCH, Some("0"), json!({ "age": "37" })))
            .into_response();
        assert_eq!(res.status_code(), Status::Ok);

        let res = api
            .update(&json_req(http::Method::PATCH, Some("0"), json!({ "age": 37.5 })))
            .into_response();
        assert_eq!(res.status_code(), Status::BadRequest);

        let res = api.get(&form(http::Method::GET, "/api/people/0", Some("0"), "")).into_response();
        assert_eq!(body(&res)["age"], json!(37));
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let api = Api::default();
        let mut req = json_req(http::Method::POST, None, json!({}));
        req.body = Bytes::from_static(b"{not json");
        let res = api.create(&req).into_response();
        assert_eq!(res.status_code(), Status::BadRequest);
        assert_eq!(body(&res)["status"], json!("error"));
    }

    #[test]
    fn api_paths() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/people/1/extra"));
        assert!(!is_api_path("/apiary.html"));
    }
}
