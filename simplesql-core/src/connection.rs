use crate::{Cursor, Dialect, Error, Logger, Result, Value};
use futures::{FutureExt, future::BoxFuture};
use std::{borrow::Cow, fmt, future::Future, sync::Arc};

/// A live link to one database.
///
/// Statements reach the connection with their placeholders already adapted to
/// [`Connection::DIALECT`]'s conventions (or to the dialect chosen by the caller).
pub trait Connection: Send + Sized + 'static {
    /// Name of the backend, used in logs.
    const NAME: &'static str;
    /// Dialect spoken natively by the backend.
    const DIALECT: Dialect;

    /// Establish a connection to the given URL.
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>> + Send;

    /// Run one statement with its positional parameters, buffering any resulting rows.
    fn execute(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Cursor>> + Send;

    fn commit(&mut self) -> impl Future<Output = Result<()>> + Send;

    fn is_open(&self) -> bool;

    fn close(self) -> impl Future<Output = Result<()>> + Send;

    /// Names of the post connect actions this connection accepts.
    fn capabilities() -> &'static [&'static str] {
        &[]
    }

    /// Apply a post connect action. Only called with names from [`Connection::capabilities`].
    fn invoke(
        &mut self,
        capability: &str,
        _args: &[Value],
    ) -> impl Future<Output = Result<()>> + Send {
        let error = Error::msg(format!(
            "{} connection does not support `{}`",
            Self::NAME,
            capability
        ));
        async move { Err(error) }
    }
}

/// Action applied to every new connection, if the connection reports the capability.
#[derive(Debug, Clone, PartialEq)]
pub struct PostConnect {
    pub capability: Cow<'static, str>,
    pub args: Vec<Value>,
}

type ConnectFn<C> = dyn Fn() -> BoxFuture<'static, Result<C>> + Send + Sync;

/// Zero argument constructor of connections, with the actions to run on each of them.
pub struct ConnectionFactory<C: Connection> {
    connect: Arc<ConnectFn<C>>,
    post_connect: Vec<PostConnect>,
}

impl<C: Connection> ConnectionFactory<C> {
    pub fn new<F, Fut>(connect: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<C>> + Send + 'static,
    {
        Self {
            connect: Arc::new(move || connect().boxed()),
            post_connect: Vec::new(),
        }
    }

    pub fn from_url(url: impl Into<Cow<'static, str>>) -> Self {
        let url = url.into();
        Self::new(move || C::connect(url.clone()))
    }

    /// Append an action, actions run in the order they were added.
    pub fn post_connect<V: Into<Value>>(
        mut self,
        capability: impl Into<Cow<'static, str>>,
        args: impl IntoIterator<Item = V>,
    ) -> Self {
        self.post_connect.push(PostConnect {
            capability: capability.into(),
            args: args.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Build a new connection and apply the supported post connect actions to it.
    pub async fn connect(&self, logger: &Logger) -> Result<C> {
        let mut connection = (self.connect)().await?;
        let capabilities = C::capabilities();
        for action in &self.post_connect {
            if capabilities.contains(&action.capability.as_ref()) {
                connection
                    .invoke(&action.capability, &action.args)
                    .await?;
            } else {
                logger.debug(format_args!(
                    "{} connection has no `{}` capability, skipped",
                    C::NAME,
                    action.capability
                ));
            }
        }
        Ok(connection)
    }
}

impl<C: Connection> Clone for ConnectionFactory<C> {
    fn clone(&self) -> Self {
        Self {
            connect: self.connect.clone(),
            post_connect: self.post_connect.clone(),
        }
    }
}

impl<C: Connection> fmt::Debug for ConnectionFactory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("connection", &C::NAME)
            .field("post_connect", &self.post_connect)
            .finish()
    }
}
