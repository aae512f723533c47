use std::fmt;

/// Credenciales de una cuenta remitente. Solo lectura durante la invocación.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub address: String,
    pub secret: String,
    pub display_name: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

// Nunca imprimir el secreto en logs
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("secret", &"***")
            .field("display_name", &self.display_name)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}
