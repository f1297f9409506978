use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "hospital-admin")]
#[command(version, about = "Administrative console for the hospital appointment database")]
pub struct Cli {
    /// Name of the database to connect to
    pub dbname: String,

    /// Port the PostgreSQL server listens on
    pub port: u16,

    /// Database user
    pub user: String,

    /// Database password
    #[arg(long, env = "HOSPITAL_DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Database host
    #[arg(long, env = "HOSPITAL_DB_HOST", default_value = "localhost")]
    pub host: String,

    /// Abandon an action after this many invalid answers to one field
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Print debug information
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            dbname: self.dbname.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl ConnectionSettings {
    /// URL shown to the user. Carries no credentials.
    pub fn display_url(&self) -> String {
        format!("postgresql://{}:{}/{}", self.host, self.port, self.dbname)
    }

    /// libpq keyword/value connection string.
    pub fn conninfo(&self) -> String {
        let mut pairs = vec![
            format!("host={}", quote_conninfo(&self.host)),
            format!("port={}", self.port),
            format!("dbname={}", quote_conninfo(&self.dbname)),
            format!("user={}", quote_conninfo(&self.user)),
        ];
        if !self.password.is_empty() {
            pairs.push(format!("password={}", quote_conninfo(&self.password)));
        }
        pairs.join(" ")
    }
}

fn quote_conninfo(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
