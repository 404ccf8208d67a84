use std::fmt::{self, Display};

use dnwalk::resolver::Hop;
use dnwalk::{RecordData, ResourceRecord};

pub const RULE: &str = "----------------------------------------------------------------";

struct Entry<'a>(&'a ResourceRecord);

impl Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        match &record.data {
            RecordData::A(addr) => write!(f, "\tName: {}\tIP: {}", record.name, addr),
            RecordData::Ns(host) => write!(f, "\tName: {}\tName Server: {}", record.name, host),
            RecordData::Other { .. } => write!(f, "\tName: {}", record.name),
        }
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str, records: &[ResourceRecord]) -> fmt::Result {
    if records.is_empty() {
        return Ok(());
    }

    writeln!(f, "\n{title}:")?;
    for record in records {
        writeln!(f, "{}", Entry(record))?;
    }

    Ok(())
}

/// One hop: the server queried and an overview of what came back.
pub struct HopReport<'a>(pub &'a Hop);

impl Display for HopReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hop = self.0;
        let reply = &hop.reply;

        writeln!(f, "\n{RULE}\n")?;
        if hop.depth > 0 {
            let indent = "  ".repeat(hop.depth);
            writeln!(f, "{indent}(resolving nameserver {})", hop.name)?;
        }
        writeln!(f, "DNS server to query: {}\n", hop.server)?;
        writeln!(f, "Reply received. Content overview:")?;
        writeln!(f, "\t{} Answers.", reply.answers.len())?;
        writeln!(f, "\t{} Intermediate Name Servers.", reply.authorities.len())?;
        writeln!(
            f,
            "\t{} Additional Information Records.",
            reply.additionals.len()
        )?;

        section(f, "Answers Section", &reply.answers)?;
        section(f, "Authority Section", &reply.authorities)?;
        section(f, "Additional Information Section", &reply.additionals)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use bytes::Bytes;
    use dnwalk::resolver::Hop;
    use dnwalk::{Message, Name, RecordData, ResourceRecord};

    use super::HopReport;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    #[test]
    fn renders_sections() {
        let mut reply = Message::default();
        reply.add_authority(ResourceRecord::ns(name("com"), 1, name("a.gtld-servers.net")));
        reply.add_authority(ResourceRecord::new(
            name("com"),
            1,
            RecordData::Other {
                type_: 6,
                data: Bytes::new(),
            },
        ));
        reply.add_additional(ResourceRecord::a(
            name("a.gtld-servers.net"),
            1,
            Ipv4Addr::new(192, 5, 6, 30),
        ));

        let text = HopReport(&Hop {
            server: Ipv4Addr::new(198, 41, 0, 4),
            name: name("example.com"),
            depth: 0,
            reply,
        })
        .to_string();

        assert!(text.contains("DNS server to query: 198.41.0.4"));
        assert!(text.contains("\t0 Answers."));
        assert!(text.contains("\t2 Intermediate Name Servers."));
        assert!(text.contains("\t1 Additional Information Records."));
        assert!(!text.contains("Answers Section"));
        assert!(text.contains("\tName: com\tName Server: a.gtld-servers.net\n"));
        assert!(text.contains("\tName: com\n"));
        assert!(text.contains("\tName: a.gtld-servers.net\tIP: 192.5.6.30\n"));
        assert!(!text.contains("resolving nameserver"));
    }

    #[test]
    fn marks_nested_hops() {
        let text = HopReport(&Hop {
            server: Ipv4Addr::new(198, 41, 0, 4),
            name: name("a.iana-servers.net"),
            depth: 1,
            reply: Message::default(),
        })
        .to_string();

        assert!(text.contains("  (resolving nameserver a.iana-servers.net)"));
    }
}
