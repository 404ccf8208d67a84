//! Iterative resolution: ask a server, follow whatever the reply points at,
//! repeat until some server answers.

use std::net::Ipv4Addr;

use async_recursion::async_recursion;
use tracing::{debug, info, instrument, warn};

use crate::{DnsError, Message, Name, Networkable, Question, RecordType};

mod transport;
pub use transport::{Transport, UdpTransport, DEFAULT_BUFFER_SIZE, DEFAULT_TIMEOUT, DNS_PORT};

pub const DEFAULT_MAX_HOPS: usize = 30;
pub const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Queries allowed for a whole lookup, nested nameserver lookups
    /// included.
    pub max_hops: usize,
    /// How many glue-less nameserver lookups may be nested inside each other.
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// One query and the reply it got.
#[derive(Debug, Clone)]
pub struct Hop {
    pub server: Ipv4Addr,
    pub name: Name,
    /// 0 for the walk the caller started, 1 for a nameserver lookup inside
    /// it, and so on.
    pub depth: usize,
    pub reply: Message,
}

#[derive(Debug, Clone)]
pub struct Lookup {
    pub address: Ipv4Addr,
    /// Every hop in the order it was sent, nested lookups included.
    pub hops: Vec<Hop>,
}

/// What a reply tells us to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Answer(Ipv4Addr),
    Glue(Ipv4Addr),
    Referral(Name),
    DeadEnd,
}

impl Step {
    fn from_reply(reply: &Message) -> Self {
        if let Some(addr) = reply.answers.iter().find_map(|r| r.as_a()) {
            Self::Answer(addr)
        } else if let Some(addr) = reply.additionals.iter().find_map(|r| r.as_a()) {
            Self::Glue(addr)
        } else if let Some(host) = reply.authorities.iter().find_map(|r| r.as_ns()) {
            Self::Referral(host.clone())
        } else {
            Self::DeadEnd
        }
    }
}

pub struct Resolver<T> {
    transport: T,
    config: ResolverConfig,
}

impl<T: Transport> Resolver<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ResolverConfig::default())
    }

    pub fn with_config(transport: T, config: ResolverConfig) -> Self {
        Self { transport, config }
    }

    /// Resolves `name` to an IPv4 address starting from `server`, usually a
    /// root server.
    #[instrument(level = "info", skip(self, name), fields(name = %name))]
    pub async fn lookup(&self, name: &Name, server: Ipv4Addr) -> Result<Lookup, DnsError> {
        let mut hops = Vec::new();
        let address = self.walk(name, server, 0, &mut hops).await?;
        info!(%address, hops = hops.len(), "resolved");

        Ok(Lookup { address, hops })
    }

    /// Walks the delegation chain for `name`. A referral to a nameserver with
    /// no glue starts a fresh walk for that nameserver's address from the
    /// current server; its result becomes the next server of this walk.
    /// Every walk keeps its own server, but all of them draw on the one
    /// query budget counted by `hops`.
    #[async_recursion]
    async fn walk(
        &self,
        name: &Name,
        start: Ipv4Addr,
        depth: usize,
        hops: &mut Vec<Hop>,
    ) -> Result<Ipv4Addr, DnsError> {
        if depth > self.config.max_depth {
            return Err(DnsError::NestingTooDeep(self.config.max_depth));
        }

        let mut server = start;

        loop {
            if hops.len() >= self.config.max_hops {
                return Err(DnsError::TooManyHops(self.config.max_hops));
            }

            debug!(%name, %server, depth, "querying");
            let reply = self.query(name, server).await?;
            let step = Step::from_reply(&reply);

            hops.push(Hop {
                server,
                name: name.clone(),
                depth,
                reply,
            });

            match step {
                Step::Answer(addr) => return Ok(addr),
                Step::Glue(addr) => {
                    debug!(%addr, "following glue");
                    server = addr;
                }
                Step::Referral(host) => {
                    debug!(%host, "referral without glue, resolving nameserver");
                    server = self.walk(&host, server, depth + 1, hops).await?;
                }
                Step::DeadEnd => {
                    warn!(%name, %server, "reply carries nothing to follow");
                    return Err(DnsError::Unresolvable(server));
                }
            }
        }
    }

    async fn query(&self, name: &Name, server: Ipv4Addr) -> Result<Message, DnsError> {
        let id = rand::random::<u16>();
        let query = Message::query(id, Question::new(name.clone(), RecordType::A));

        let data = self
            .transport
            .send_and_receive(server, &query.to_bytes())
            .await?;
        let reply = Message::parse(&data)?;

        if reply.header.id != id {
            return Err(DnsError::IdMismatch {
                expected: id,
                got: reply.header.id,
            });
        }

        Ok(reply)
    }
}
