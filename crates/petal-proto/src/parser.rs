//! Order file reader.
//!
//! Records are `client_order_id, instrument, side, quantity, price`. The
//! first `HEADER_LINES` records are metadata and are skipped.

use std::borrow::Cow;
use std::io::Read;

use csv::{ByteRecord, ReaderBuilder, Trim};
use petal_core::{OrderRequest, Price};
use tracing::{debug, trace};

use crate::error::ProtoError;

/// Leading records skipped before the first order.
pub const HEADER_LINES: usize = 2;

/// Fields in a complete order record.
pub const ORDER_FIELDS: usize = 5;

/// Streams `OrderRequest`s out of a CSV source.
pub struct OrderReader<R: Read> {
    records: csv::Reader<R>,
    record: ByteRecord,
    header_pending: bool,
}

impl<R: Read> OrderReader<R> {
    /// Wrap a byte source.
    pub fn new(source: R) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(source);
        Self {
            records,
            record: ByteRecord::new(),
            header_pending: true,
        }
    }

    /// Read the next request, or `None` at end of input.
    pub fn read_request(&mut self) -> Result<Option<OrderRequest>, ProtoError> {
        if self.header_pending {
            self.header_pending = false;
            for _ in 0..HEADER_LINES {
                if !self.records.read_byte_record(&mut self.record)? {
                    return Ok(None);
                }
                trace!(fields = self.record.len(), "skip header record");
            }
        }

        if !self.records.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        if self.record.len() < ORDER_FIELDS {
            let line = self.record.position().map_or(0, |p| p.line());
            debug!(line, fields = self.record.len(), "short order record");
        }
        Ok(Some(parse_record(&self.record)))
    }
}

impl<R: Read> Iterator for OrderReader<R> {
    type Item = Result<OrderRequest, ProtoError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_request().transpose()
    }
}

/// Build a request from one record.
///
/// Missing fields read as empty; numeric fields that do not parse become
/// `None` and are refused at admission.
pub fn parse_record(record: &ByteRecord) -> OrderRequest {
    OrderRequest {
        client_order_id: field(record, 0).into_owned(),
        instrument: field(record, 1).into_owned(),
        side: field(record, 2).parse().ok(),
        quantity: field(record, 3).parse().ok(),
        price: field(record, 4).parse::<Price>().ok(),
    }
}

#[inline]
fn field(record: &ByteRecord, idx: usize) -> Cow<'_, str> {
    String::from_utf8_lossy(record.get(idx).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str) -> Vec<OrderRequest> {
        OrderReader::new(input.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_skips_header_lines() {
        let input = "orders.csv\nClient Order ID,Instrument,Side,Quantity,Price\naa1,Rose,1,100,55.5\n";
        let requests = read_all(input);

        assert_eq!(requests, vec![OrderRequest::new("aa1", "Rose", 1, 100, Price::new(555, 1))]);
    }

    #[test]
    fn test_header_only_input() {
        assert!(read_all("orders.csv\nClient Order ID,Instrument,Side,Quantity,Price\n").is_empty());
        assert!(read_all("orders.csv\n").is_empty());
        assert!(read_all("").is_empty());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let requests = read_all("t\nh\n aa2 , Lotus ,2, 30 , 10.00 \n");
        assert_eq!(requests[0], OrderRequest::new("aa2", "Lotus", 2, 30, Price::new(1000, 2)));
    }

    #[test]
    fn test_scientific_price() {
        let requests = read_all("t\nh\naa3,Tulip,1,10,1.05e1\n");
        assert_eq!(requests[0].price, Some(Price::new(105, 1)));
    }

    #[test]
    fn test_malformed_fields_become_none() {
        let requests = read_all("t\nh\naa4,Rose,buy,ten,cheap\n");
        let request = &requests[0];

        assert_eq!(request.client_order_id, "aa4");
        assert_eq!(request.side, None);
        assert_eq!(request.quantity, None);
        assert_eq!(request.price, None);
    }

    #[test]
    fn test_short_record_is_still_a_request() {
        let requests = read_all("t\nh\naa5,Orchid\n");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].instrument, "Orchid");
        assert_eq!(requests[0].side, None);
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let mut input = b"t\nh\n".to_vec();
        input.extend_from_slice(b"a\xffz,Rose,1,10,1\n");
        let requests: Vec<_> = OrderReader::new(input.as_slice()).collect::<Result<_, _>>().unwrap();

        assert_eq!(requests[0].client_order_id, "a\u{fffd}z");
        assert_eq!(requests[0].quantity, Some(10));
    }

    #[test]
    fn test_negative_and_zero_values_parse() {
        let requests = read_all("t\nh\naa6,Rose,1,-10,-1\naa7,Rose,0,0,0\n");
        assert_eq!(requests[0].quantity, Some(-10));
        assert_eq!(requests[0].price, Some(Price::from_units(-1)));
        assert_eq!(requests[1].side, Some(0));
    }
}
