use seed::prelude::*;

const AUTH_FLAG_KEY: &str = "isAuthenticated";
const USERNAME_KEY: &str = "username";
const ROLE_KEY: &str = "role";
const LOGIN_PATH: &str = "/login";

/// Who is logged in, according to the session the surrounding client stores
/// in `localStorage`. The widget only mounts when this returns a user.
pub fn current_user() -> Option<String> {
    let storage = local_storage()?;
    let authenticated = storage.get_item(AUTH_FLAG_KEY).ok()??;
    if authenticated != "true" {
        return None;
    }
    storage.get_item(USERNAME_KEY).ok()?
}

/// Drops the stored session and hands control back to the login screen.
pub fn logout() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(AUTH_FLAG_KEY);
        let _ = storage.remove_item(USERNAME_KEY);
        let _ = storage.remove_item(ROLE_KEY);
    }
    go_to_login();
}

/// Fire-and-forget navigation signal; the widget keeps no routing history.
pub fn go_to_login() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(LOGIN_PATH);
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}
