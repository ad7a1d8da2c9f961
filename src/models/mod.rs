pub mod campaign;
pub mod explanatory_material;
pub mod graphic_asset;
pub mod spot_request;
pub mod user_role;
