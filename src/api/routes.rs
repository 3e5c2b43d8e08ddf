//! Backend endpoint paths, relative to the configured base URL

pub const EQUIPMENT_LIST: &str = "/api/equipment/get_all";
pub const EQUIPMENT_TYPES: &str = "/api/equipment/get_all_types";
/// Followed by the percent-encoded model name
pub const EQUIPMENT_FOR_REQUEST: &str = "/api/equipment/get_equipment_for_request";

pub const REQUEST_CREATE: &str = "/api/equipment/add_request";
pub const REQUEST_DELETE: &str = "/api/equipment/delete_request";
pub const REQUEST_LIST: &str = "/api/equipment/get_all_requests";

pub const STAGED_CREATE: &str = "/api/equipment/create_staged_request";
pub const STAGED_DELETE: &str = "/api/equipment/delete_staged_request";
pub const STAGED_LIST: &str = "/api/equipment/get_all_staged_requests";

pub const CHECKOUT_CREATE: &str = "/api/equipment/create_checkout";
pub const CHECKOUT_ACTIVE: &str = "/api/equipment/get_all_active_checkouts";
pub const CHECKOUT_HISTORY: &str = "/api/equipment/get_all_checkouts";
pub const CHECKOUT_RETURN: &str = "/api/equipment/return_checkout";

pub const WAIVER_UPDATE: &str = "/api/equipment/update_waiver_field";
pub const PROFILE: &str = "/api/profile";
