use crate::models::User;

/// Способность "кто сейчас вошёл". Сами протоколы аутентификации живут
/// во внешнем провайдере; ядру достаточно этого контракта.
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Гость: никто не вошёл.
pub struct Anonymous;

impl AuthProvider for Anonymous {
    fn current_user(&self) -> Option<User> {
        None
    }
}

/// Уже выполненный вход (например, восстановленная сессия).
pub struct StoredSession {
    user: User,
}

impl StoredSession {
    pub fn new(user: User) -> Self {
        StoredSession { user }
    }
}

impl AuthProvider for StoredSession {
    fn current_user(&self) -> Option<User> {
        Some(self.user.clone())
    }
}
