use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use hex::encode as hex_encode;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::config::{
    DEFAULT_OWNER_PASSWORD, DEFAULT_OWNER_ROLE, DEFAULT_OWNER_USERNAME, DEFAULT_PBKDF2_ITERATIONS,
};
use crate::models::UserRecord;

pub fn generate_password_hash(password: &str) -> String {
    let mut salt_bytes = [0u8; 12];
    rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
    let salt = hex_encode(salt_bytes);
    let mut dk = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), DEFAULT_PBKDF2_ITERATIONS, &mut dk);
    let hash_hex = hex_encode(dk);
    format!("pbkdf2:sha256:{}${}${}", DEFAULT_PBKDF2_ITERATIONS, salt, hash_hex)
}

pub fn verify_password(stored: &str, candidate: &str) -> bool {
    if let Some(rest) = stored.strip_prefix("pbkdf2:sha256:") {
        if let Some((iter_s, salt_hash)) = rest.split_once('$') {
            if let Some((salt, expected_hash)) = salt_hash.split_once('$') {
                if let Ok(iter) = iter_s.parse::<u32>() {
                    let mut dk = [0u8; 32];
                    pbkdf2_hmac::<Sha256>(candidate.as_bytes(), salt.as_bytes(), iter, &mut dk);
                    let computed = hex_encode(dk);
                    return computed == expected_hash;
                }
            }
        }
    }
    false
}

pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex_encode(b)
}

/// Load users.json. A missing file bootstraps a default owner account and
/// writes it back so operators can log in on a fresh install.
pub fn load_users_from_file() -> Arc<Mutex<HashMap<String, UserRecord>>> {
    let path = std::path::Path::new("users.json");
    let mut map: HashMap<String, UserRecord> = HashMap::new();

    if path.exists() {
        if let Ok(text) = std::fs::read_to_string(path) {
            if let Ok(json_val) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Some(obj) = json_val.as_object() {
                    for (k, v) in obj.iter() {
                        if let Some(pw) = v.get("password").and_then(|x| x.as_str()) {
                            let role = v
                                .get("role")
                                .and_then(|x| x.as_str())
                                .unwrap_or("editor")
                                .to_string();
                            map.insert(
                                k.to_lowercase(),
                                UserRecord {
                                    password: pw.to_string(),
                                    role,
                                },
                            );
                        }
                    }
                }
            }
        }
    } else {
        map.insert(
            DEFAULT_OWNER_USERNAME.into(),
            UserRecord {
                password: generate_password_hash(DEFAULT_OWNER_PASSWORD),
                role: DEFAULT_OWNER_ROLE.into(),
            },
        );
        let users_arc = Arc::new(Mutex::new(map));
        if let Err(e) = persist_users_file(&users_arc) {
            tracing::warn!(%e, "Failed to write initial users.json");
        }
        return users_arc;
    }

    Arc::new(Mutex::new(map))
}

pub fn persist_users_file(
    users_arc: &Arc<Mutex<HashMap<String, UserRecord>>>,
) -> Result<(), std::io::Error> {
    let users = users_arc.lock().unwrap();
    let mut serialized: serde_json::Map<String, serde_json::Value> = serde_json::Map::new();
    for (u, rec) in users.iter() {
        serialized.insert(
            u.clone(),
            serde_json::json!({"password": rec.password, "role": rec.role}),
        );
    }
    let json = serde_json::to_string_pretty(&serde_json::Value::Object(serialized))?;
    let mut tmp = tempfile::NamedTempFile::new_in(".")?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist("users.json").map_err(|e| e.error)?;
    Ok(())
}
