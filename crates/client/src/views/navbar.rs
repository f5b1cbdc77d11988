use entities::User;

use crate::session::SessionClient;

pub struct Navbar {
    user: Option<User>,
}

impl Navbar {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub async fn load<C: SessionClient + ?Sized>(client: &C) -> anyhow::Result<Self> {
        Ok(Self::new(client.current_user().await?))
    }

    /// `None` when nobody is signed in, the identity block isn't shown then.
    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(User::display_name)
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.email.as_str())
    }

    pub async fn sign_out<C: SessionClient + ?Sized>(&mut self, client: &C) -> anyhow::Result<()> {
        client.sign_out().await?;
        self.user = None;
        Ok(())
    }
}
