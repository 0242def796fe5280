use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// A stored drug. `price` is a decimal string such as `"9.99"`.
#[derive(ToSchema)]
pub struct DrugDoc {
    pub uid: Uuid,
    pub manufacturer: String,
    pub name: String,
    pub quantity: i32,
    #[schema(example = "9.99")]
    pub price: String,
}

/// Create/update body. `uid` is honoured on create only; `price` may be a
/// JSON number or a decimal string.
#[derive(ToSchema)]
pub struct DrugPayloadDoc {
    pub uid: Option<Uuid>,
    pub manufacturer: String,
    pub name: String,
    pub quantity: i64,
    #[schema(example = "9.99")]
    pub price: String,
}

#[derive(ToSchema)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub message: Option<String>,
    pub fields: Option<Vec<FieldErrorDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Drug Inventory API",
        version = "1.0.0",
        description = "API for managing drug information in pharmacy inventory management system"
    ),
    paths(
        crate::routes::health,
        crate::routes::drugs::create,
        crate::routes::drugs::create_batch,
        crate::routes::drugs::get_one,
        crate::routes::drugs::list,
        crate::routes::drugs::by_manufacturer,
        crate::routes::drugs::search,
        crate::routes::drugs::by_max_price,
        crate::routes::drugs::update,
        crate::routes::drugs::delete,
    ),
    components(
        schemas(
            HealthResponse,
            DrugDoc,
            DrugPayloadDoc,
            FieldErrorDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "drugs")
    )
)]
pub struct ApiDoc;
