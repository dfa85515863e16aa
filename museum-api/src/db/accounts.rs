//! Account and role queries
//!
//! A user row plus exactly one role row is always written in a single
//! transaction, so a failed registration never leaves a half-created account.

use museum_common::api::{hash_password, Role};
use museum_common::db::{Credentials, EmployeeInfo, EmployeeSummary, Profile, SupervisorInfo};
use museum_common::{Error, Result};
use sqlx::{SqliteConnection, SqlitePool};

/// Fields shared by every registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub year_of_birth: Option<i64>,
}

async fn insert_user(conn: &mut SqliteConnection, user: &NewUser) -> Result<()> {
    let password = hash_password(&user.password);
    sqlx::query(
        r#"
        INSERT INTO users (email, first_name, middle_name, last_name, username,
                           password_hash, password_salt, year_of_birth)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.middle_name)
    .bind(&user.last_name)
    .bind(&user.username)
    .bind(&password.hash)
    .bind(&password.salt)
    .bind(user.year_of_birth)
    .execute(conn)
    .await
    .map_err(|e| Error::from_constraint(e, "Account"))?;
    Ok(())
}

/// Create a visitor account
pub async fn register_visitor(db: &SqlitePool, user: &NewUser) -> Result<()> {
    let mut tx = db.begin().await?;
    insert_user(&mut *tx, user).await?;
    sqlx::query("INSERT INTO visitors (email) VALUES (?)")
        .bind(&user.email)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Create a supervisor account, adding the museum if it is new
pub async fn register_supervisor(
    db: &SqlitePool,
    user: &NewUser,
    museum_name: &str,
    museum_address: &str,
) -> Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("INSERT OR IGNORE INTO museums (address, name) VALUES (?, ?)")
        .bind(museum_address)
        .bind(museum_name)
        .execute(&mut *tx)
        .await?;
    insert_user(&mut *tx, user).await?;
    sqlx::query("INSERT INTO supervisors (email, museum_address) VALUES (?, ?)")
        .bind(&user.email)
        .bind(museum_address)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Create an employee account under an existing supervisor
pub async fn register_employee(
    db: &SqlitePool,
    user: &NewUser,
    supervisor_email: &str,
    museum_address: &str,
) -> Result<()> {
    let mut tx = db.begin().await?;

    let supervisor: Option<(String,)> = sqlx::query_as("SELECT email FROM supervisors WHERE email = ?")
        .bind(supervisor_email)
        .fetch_optional(&mut *tx)
        .await?;
    if supervisor.is_none() {
        return Err(Error::NotFound(format!("Supervisor {} not found", supervisor_email)));
    }

    insert_user(&mut *tx, user).await?;
    sqlx::query("INSERT INTO employees (email, supervisor_email, museum_address) VALUES (?, ?, ?)")
        .bind(&user.email)
        .bind(supervisor_email)
        .bind(museum_address)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::from_constraint(e, "Employee"))?;
    tx.commit().await?;
    Ok(())
}

/// Stored password hash and salt, `None` for unknown emails
pub async fn credentials(db: &SqlitePool, email: &str) -> Result<Option<Credentials>> {
    let creds = sqlx::query_as::<_, Credentials>(
        "SELECT password_hash, password_salt FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(creds)
}

/// Roles held by an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Roles {
    pub visitor: bool,
    pub supervisor: bool,
    pub employee: bool,
}

impl Roles {
    pub fn has(&self, role: Role) -> bool {
        match role {
            Role::Visitor => self.visitor,
            Role::Supervisor => self.supervisor,
            Role::Employee => self.employee,
        }
    }

    /// Staff role used at the staff login, supervisor first
    pub fn staff_role(&self) -> Option<Role> {
        if self.supervisor {
            Some(Role::Supervisor)
        } else if self.employee {
            Some(Role::Employee)
        } else {
            None
        }
    }
}

pub async fn roles(db: &SqlitePool, email: &str) -> Result<Roles> {
    let (visitor, supervisor, employee): (bool, bool, bool) = sqlx::query_as(
        r#"
        SELECT EXISTS(SELECT 1 FROM visitors WHERE email = ?1),
               EXISTS(SELECT 1 FROM supervisors WHERE email = ?1),
               EXISTS(SELECT 1 FROM employees WHERE email = ?1)
        "#,
    )
    .bind(email)
    .fetch_one(db)
    .await?;

    Ok(Roles {
        visitor,
        supervisor,
        employee,
    })
}

pub async fn profile(db: &SqlitePool, email: &str) -> Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT email, first_name, middle_name, last_name, username, year_of_birth
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(profile)
}

async fn set_username(conn: &mut SqliteConnection, email: &str, username: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE users SET username = ? WHERE email = ?")
        .bind(username)
        .bind(email)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn set_password(conn: &mut SqliteConnection, email: &str, password: &str) -> Result<bool> {
    let hashed = hash_password(password);
    let result = sqlx::query("UPDATE users SET password_hash = ?, password_salt = ? WHERE email = ?")
        .bind(&hashed.hash)
        .bind(&hashed.salt)
        .bind(email)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns false when no account matched
pub async fn update_username(db: &SqlitePool, email: &str, username: &str) -> Result<bool> {
    let mut conn = db.acquire().await?;
    set_username(&mut *conn, email, username).await
}

/// Change username and/or re-hash a new password in one transaction
///
/// Returns false, leaving the account untouched, when no account matched.
pub async fn update_credentials(
    db: &SqlitePool,
    email: &str,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<bool> {
    let mut tx = db.begin().await?;

    if let Some(username) = username {
        if !set_username(&mut *tx, email, username).await? {
            return Ok(false);
        }
    }
    if let Some(password) = password {
        if !set_password(&mut *tx, email, password).await? {
            return Ok(false);
        }
    }

    tx.commit().await?;
    Ok(true)
}

/// Delete an account and, by cascade, its role rows, visits and reviews
pub async fn delete_user(db: &SqlitePool, email: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE email = ?")
        .bind(email)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn supervisor_info(db: &SqlitePool, email: &str) -> Result<Option<SupervisorInfo>> {
    let info = sqlx::query_as::<_, SupervisorInfo>(
        r#"
        SELECT u.username, m.name AS museum, s.museum_address
        FROM users u
        JOIN supervisors s ON u.email = s.email
        JOIN museums m ON s.museum_address = m.address
        WHERE u.email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(info)
}

pub async fn supervisor_employees(db: &SqlitePool, supervisor_email: &str) -> Result<Vec<EmployeeSummary>> {
    let employees = sqlx::query_as::<_, EmployeeSummary>(
        r#"
        SELECT e.email, u.first_name, u.last_name, u.username
        FROM employees e
        JOIN users u ON e.email = u.email
        WHERE e.supervisor_email = ?
        ORDER BY u.last_name, u.first_name
        "#,
    )
    .bind(supervisor_email)
    .fetch_all(db)
    .await?;
    Ok(employees)
}

pub async fn employee_info(db: &SqlitePool, email: &str) -> Result<Option<EmployeeInfo>> {
    let info = sqlx::query_as::<_, EmployeeInfo>(
        r#"
        SELECT u.username, m.name AS museum_name, e.museum_address, e.supervisor_email
        FROM employees e
        JOIN users u ON e.email = u.email
        LEFT JOIN museums m ON e.museum_address = m.address
        WHERE e.email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(info)
}

/// Supervisor an employee reports to
pub async fn supervisor_of(conn: &mut SqliteConnection, employee_email: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT supervisor_email FROM employees WHERE email = ?")
        .bind(employee_email)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(|(s,)| s))
}
