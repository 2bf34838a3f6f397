/// Routing hook invoked when the server rejects the session.
pub trait NavigationController: Send + Sync {
    fn redirect_to_login(&self);
}

impl<F> NavigationController for F
where
    F: Fn() + Send + Sync,
{
    fn redirect_to_login(&self) {
        self()
    }
}
