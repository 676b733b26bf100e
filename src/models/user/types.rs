use serde::{Deserialize, Serialize};

/// Internal user row for authentication — includes the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub department: Option<String>,
    pub manager_name: Option<String>,
    pub photo: Option<String>,
}

/// Safe profile for API responses — no password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub manager_name: Option<String>,
    pub photo: Option<String>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        UserProfile {
            user_id: u.user_id,
            name: u.name,
            email: u.email,
            department: u.department,
            manager_name: u.manager_name,
            photo: u.photo,
        }
    }
}

/// New user data for creation. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub department: Option<String>,
    pub manager_name: Option<String>,
    pub photo: Option<String>,
}

/// One row of a bulk import, already parsed out of the uploaded CSV.
/// Header aliases ("Employee Name", "Official Email", ...) are resolved
/// by the uploader; this layer sees the canonical field names.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "managerName", alias = "manager")]
    pub manager_name: Option<String>,
    #[serde(default, alias = "photoUrl", alias = "avatar")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub inserted: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportError {
    pub row: usize,
    pub reason: String,
}
