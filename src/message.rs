use std::io::Cursor;

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, instrument};

use super::{Header, Networkable, Question, ResourceRecord};
use crate::{DnsError, Flags};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    /// A standard query (flags 0x0100) carrying a single question.
    pub fn query(id: u16, question: Question) -> Self {
        let mut message = Self::new(Header::new(id, Flags::standard_query()));
        message.add_question(question);
        message
    }

    /// Decodes a complete datagram. Unlike `from_bytes`, anything left after
    /// the sections the header announced is an error.
    ///
    /// A header whose counts disagree with the records present fails either
    /// way: counts that are too high run out of data (`TruncatedMessage`),
    /// counts that are too low leave records unread (`TrailingBytes`). Both
    /// belong to the truncation family, see `DnsError::is_truncation`.
    pub fn parse(data: &[u8]) -> Result<Self, DnsError> {
        let mut cursor = Cursor::new(data);
        let message = Self::from_bytes(&mut cursor)?;

        if cursor.has_remaining() {
            return Err(DnsError::TrailingBytes(cursor.remaining()));
        }

        Ok(message)
    }

    pub fn add_question(&mut self, question: Question) {
        self.header.num_questions += 1;
        self.questions.push(question)
    }

    pub fn add_answer(&mut self, answer: ResourceRecord) {
        self.header.num_answers += 1;
        self.answers.push(answer)
    }

    pub fn add_authority(&mut self, answer: ResourceRecord) {
        self.header.num_authorities += 1;
        self.authorities.push(answer)
    }

    pub fn add_additional(&mut self, answer: ResourceRecord) {
        self.header.num_additionals += 1;
        self.additionals.push(answer)
    }
}

fn read_records(
    bytes: &mut Cursor<&[u8]>,
    count: u16,
) -> Result<Vec<ResourceRecord>, DnsError> {
    (0..count)
        .map(|_| ResourceRecord::from_bytes(bytes))
        .collect()
}

impl Networkable for Message {
    #[instrument(level = "debug", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let mut response = BytesMut::new();
        response.extend_from_slice(&self.header.to_bytes());

        for question in self.questions.iter() {
            response.extend_from_slice(&question.to_bytes())
        }

        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            response.extend_from_slice(&record.to_bytes())
        }

        response.into()
    }

    #[instrument(level = "debug", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let header = Header::from_bytes(bytes)?;
        debug!(
            id = header.id,
            questions = header.num_questions,
            answers = header.num_answers,
            authorities = header.num_authorities,
            additionals = header.num_additionals,
            "parsing message"
        );

        let questions = (0..header.num_questions)
            .map(|_| Question::from_bytes(bytes))
            .collect::<Result<Vec<_>, _>>()?;
        let answers = read_records(bytes, header.num_answers)?;
        let authorities = read_records(bytes, header.num_authorities)?;
        let additionals = read_records(bytes, header.num_additionals)?;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}
