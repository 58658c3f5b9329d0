use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing the owner of companies, clients, accounts and invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  /// User's first name, used to greet recipients in outgoing email
  pub first_name: String,
  /// User's last name
  pub last_name: String,
  /// User's email address (unique)
  pub email: String,
  /// Optional contact phone number
  pub phone_number: Option<String>,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp when the user was last updated
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// Creates a new user with the given details
  pub fn new(first_name: String, last_name: String, email: String) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      first_name,
      last_name,
      email,
      phone_number: None,
      created_at: now,
      updated_at: now,
    }
  }

  /// Returns "first last", trimmed when either part is empty
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
      .trim()
      .to_string()
  }
}

/// Session entity representing an issued bearer credential
///
/// Only the SHA-256 hash of the token is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  /// Unique identifier for the session
  pub id: Uuid,
  /// Reference to the user who owns this session
  pub user_id: Uuid,
  /// Hex encoded SHA-256 of the bearer token
  pub token_hash: String,
  /// Timestamp when the session expires
  pub expires_at: DateTime<Utc>,
  /// Timestamp when the session was created
  pub created_at: DateTime<Utc>,
}

impl Session {
  /// Creates a new session for a user
  pub fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      token_hash,
      expires_at,
      created_at: Utc::now(),
    }
  }

  /// Checks if the session has expired
  pub fn is_expired(&self) -> bool {
    Utc::now() > self.expires_at
  }
}
