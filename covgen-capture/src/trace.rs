//! Classic libpcap trace writing and reading
//!
//! Traces use the original microsecond pcap container: a 24 byte global
//! header (little-endian magic `0xa1b2c3d4`, version 2.4, snaplen 65535,
//! Ethernet link type) followed by one record per packet. Record timestamps
//! start at the artifact stamp and advance by one millisecond per packet.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use bytes::{BufMut, BytesMut};
use covgen_core::{Error, PacketDescriptor, Result};
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, Linktype, PcapBlockOwned, PcapError};
use tracing::{debug, info};

use crate::frame;
use crate::naming::{trace_file_name, ArtifactStamp};
use crate::stats::TraceStats;

/// Microsecond-resolution pcap magic
pub const PCAP_MAGIC: u32 = 0xa1b2_c3d4;
pub const PCAP_VERSION_MAJOR: u16 = 2;
pub const PCAP_VERSION_MINOR: u16 = 4;
pub const PCAP_SNAPLEN: u32 = 65535;
/// LINKTYPE_ETHERNET
pub const PCAP_LINKTYPE_ETHERNET: u32 = 1;

/// Global header size in bytes
pub const GLOBAL_HEADER_LEN: usize = 24;
/// Per-record header size in bytes
pub const RECORD_HEADER_LEN: usize = 16;

/// Spacing between consecutive record timestamps
pub const PACKET_INTERVAL_US: u64 = 1_000;

/// One packet record read back from a trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub ts_sec: u32,
    pub ts_usec: u32,
    pub data: Vec<u8>,
}

/// Writes one trace file per pattern into an output directory
#[derive(Debug, Clone)]
pub struct TraceWriter {
    output_dir: PathBuf,
}

impl TraceWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `packets` in order to `covert_<label>_<stamp>.pcap`
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when `packets` is empty, when the file already
    /// exists, or when the write fails. A partially written file is removed.
    pub fn write(
        &self,
        label: &str,
        packets: &[PacketDescriptor],
        stamp: &ArtifactStamp,
    ) -> Result<(PathBuf, TraceStats)> {
        let path = self.output_dir.join(trace_file_name(label, stamp));

        if packets.is_empty() {
            return Err(Error::persistence(
                label,
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "no packets to write"),
            ));
        }

        let (buffer, stats) = encode_trace(packets, stamp)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::persistence(label, path.clone(), e))?;

        if let Err(e) = file.write_all(&buffer).and_then(|_| file.flush()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(Error::persistence(label, path, e));
        }

        info!(
            label = %label,
            path = %path.display(),
            packets = stats.packets,
            bytes = stats.bytes,
            "Wrote trace"
        );
        Ok((path, stats))
    }
}

fn put_global_header(buf: &mut BytesMut) {
    buf.put_u32_le(PCAP_MAGIC);
    buf.put_u16_le(PCAP_VERSION_MAJOR);
    buf.put_u16_le(PCAP_VERSION_MINOR);
    buf.put_i32_le(0); // thiszone
    buf.put_u32_le(0); // sigfigs
    buf.put_u32_le(PCAP_SNAPLEN);
    buf.put_u32_le(PCAP_LINKTYPE_ETHERNET);
}

fn encode_trace(packets: &[PacketDescriptor], stamp: &ArtifactStamp) -> Result<(BytesMut, TraceStats)> {
    let mut buf = BytesMut::with_capacity(GLOBAL_HEADER_LEN + packets.len() * 128);
    let mut stats = TraceStats::new();
    put_global_header(&mut buf);

    let (base_sec, base_usec) = stamp.epoch_parts();

    for (i, packet) in packets.iter().enumerate() {
        let data = frame::encode(packet)?;
        let len = u32::try_from(data.len())
            .ok()
            .filter(|len| *len <= PCAP_SNAPLEN)
            .ok_or_else(|| {
                Error::PacketConstruction(format!(
                    "{} byte frame exceeds snaplen {}",
                    data.len(),
                    PCAP_SNAPLEN
                ))
            })?;

        let offset_us = base_usec as u64 + i as u64 * PACKET_INTERVAL_US;
        let ts_sec = base_sec.saturating_add((offset_us / 1_000_000) as u32);
        let ts_usec = (offset_us % 1_000_000) as u32;

        buf.put_u32_le(ts_sec);
        buf.put_u32_le(ts_usec);
        buf.put_u32_le(len);
        buf.put_u32_le(len);
        buf.put_slice(&data);

        debug!(index = i, len, ts_sec, ts_usec, "Encoded record");
        stats.record_packet(data.len());
    }

    Ok((buf, stats))
}

/// Read every packet record of a classic pcap file
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = LegacyPcapReader::new(65536, BufReader::new(file))
        .map_err(|e| Error::parsing(format!("{} is not a legacy pcap file: {:?}", path.display(), e)))?;

    let mut records = Vec::new();
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                match block {
                    PcapBlockOwned::LegacyHeader(hdr) => {
                        if hdr.network != Linktype::ETHERNET {
                            return Err(Error::parsing(format!(
                                "unsupported link type {}",
                                hdr.network.0
                            )));
                        }
                    }
                    PcapBlockOwned::Legacy(block) => records.push(TraceRecord {
                        ts_sec: block.ts_sec,
                        ts_usec: block.ts_usec,
                        data: block.data.to_vec(),
                    }),
                    PcapBlockOwned::NG(_) => {
                        return Err(Error::parsing("pcapng blocks are not supported"));
                    }
                }
                reader.consume(offset);
            }
            Err(PcapError::Eof) => break,
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| Error::parsing(format!("refill error: {:?}", e)))?;
            }
            Err(e) => return Err(Error::parsing(format!("pcap parse error: {:?}", e))),
        }
    }

    debug!(path = %path.display(), records = records.len(), "Read trace");
    Ok(records)
}

/// Read a trace back into packet descriptors, in record order
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<PacketDescriptor>> {
    read_records(path)?
        .iter()
        .map(|record| frame::decode(&record.data))
        .collect()
}
