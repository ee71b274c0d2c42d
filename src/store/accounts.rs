use std::sync::{OnceLock, RwLock};

use uuid::Uuid;

use super::StoreError;
use crate::crypto::PasswordHash;
use crate::models::{Account, AccountProfile, NewAccount, Role};

/// Demo credentials shared by both seeded accounts.
pub const DEMO_PASSWORD: &str = "password123";

static DECOY_HASH: OnceLock<PasswordHash> = OnceLock::new();

/// Hash checked when no account matches, so misses cost the same as
/// wrong passwords.
fn decoy_hash() -> &'static PasswordHash {
    DECOY_HASH.get_or_init(|| PasswordHash::new(&Uuid::new_v4().to_string()))
}

/// Registered portal users. Lookups are a linear scan; the roster is small.
pub struct AccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
        }
    }

    /// Store seeded with one demo student and one demo teacher.
    pub fn with_demo_accounts() -> Result<Self, StoreError> {
        let store = Self::new();
        store.register(NewAccount {
            email: "student@college.com".into(),
            password: DEMO_PASSWORD.into(),
            name: "Aman Kumar".into(),
            role: Role::Student,
            roll_no: Some("2021001".into()),
            course: Some("B.Sc. Physics".into()),
            year: Some("3".into()),
            department: None,
        })?;
        store.register(NewAccount {
            email: "teacher@college.com".into(),
            password: DEMO_PASSWORD.into(),
            name: "Dr. Sharma".into(),
            role: Role::Teacher,
            roll_no: None,
            course: None,
            year: None,
            department: Some("Physics".into()),
        })?;
        Ok(store)
    }

    /// Create an account. Emails are unique ignoring case.
    pub fn register(&self, new: NewAccount) -> Result<AccountProfile, StoreError> {
        let email = new.email.trim().to_string();
        if email.is_empty() {
            return Err(StoreError::InvalidAccount("email is required".into()));
        }
        if new.password.is_empty() {
            return Err(StoreError::InvalidAccount("password is required".into()));
        }

        // Hash before taking the write lock.
        let password = PasswordHash::new(&new.password);
        let is_student = new.role == Role::Student;
        let account = Account {
            id: Uuid::new_v4(),
            email,
            name: new.name.trim().to_string(),
            role: new.role,
            roll_no: new.roll_no.filter(|_| is_student),
            course: new.course.filter(|_| is_student),
            year: new.year.filter(|_| is_student),
            department: new.department.filter(|_| !is_student),
            password,
        };

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(StoreError::AccountExists(account.email));
        }
        let profile = account.profile();
        accounts.push(account);
        tracing::info!(account_id = %profile.id, role = %profile.role, "Account registered");
        Ok(profile)
    }

    /// Verify credentials for `role`. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AccountProfile, StoreError> {
        let candidate = {
            let accounts = self
                .accounts
                .read()
                .map_err(|_| StoreError::LockPoisoned)?;
            accounts
                .iter()
                .find(|a| a.role == role && a.email.eq_ignore_ascii_case(email.trim()))
                .cloned()
        };

        // An unknown email still pays for one PBKDF2 run.
        let verified = match &candidate {
            Some(account) => account.password.verify(password),
            None => decoy_hash().verify(password),
        };

        match candidate {
            Some(account) if verified => Ok(account.profile()),
            _ => Err(StoreError::InvalidCredentials),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(accounts.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
