use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::{PcapNGPacketBlock, PcapReaderIterator},
};

use crate::source::{FrameEvent, FrameSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    Interface, interface_for, is_pcapng_magic, legacy_ts_to_seconds, pcapng_ts_to_seconds,
    read_magic_and_rewind, simple_packet_len,
};

pub struct PcapFileSource {
    inner: PcapReader,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
        nanosecond: bool,
    },
    Ng {
        reader: PcapNGReader<File>,
        interfaces: Vec<Interface>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        let inner = create_reader(file).map_err(SourceError::from)?;
        Ok(Self { inner })
    }
}

impl FrameSource for PcapFileSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError> {
        next_frame(&mut self.inner).map_err(SourceError::from)
    }
}

fn create_reader(file: File) -> Result<PcapReader, PcapSourceError> {
    let mut file = file;
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
            .map_err(|e| PcapSourceError::pcap("pcapng reader init", e))?;
        Ok(PcapReader::Ng {
            reader,
            interfaces: Vec::new(),
        })
    } else {
        let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
            .map_err(|e| PcapSourceError::pcap("pcap reader init", e))?;
        Ok(PcapReader::Legacy {
            reader,
            linktype: None,
            nanosecond: false,
        })
    }
}

fn next_frame(reader: &mut PcapReader) -> Result<Option<FrameEvent>, PcapSourceError> {
    match reader {
        PcapReader::Legacy {
            reader,
            linktype,
            nanosecond,
        } => drain(reader, "pcap reader", |block| match block {
            PcapBlockOwned::LegacyHeader(header) => {
                *linktype = Some(header.network);
                *nanosecond = header.is_nanosecond_precision();
                None
            }
            PcapBlockOwned::Legacy(packet) => Some(FrameEvent {
                ts: Some(legacy_ts_to_seconds(
                    packet.ts_sec,
                    packet.ts_usec,
                    *nanosecond,
                )),
                linktype: linktype.unwrap_or(Linktype::ETHERNET),
                data: packet.data.to_vec(),
            }),
            _ => None,
        }),
        PcapReader::Ng { reader, interfaces } => {
            drain(reader, "pcapng reader", |block| match block {
                PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                    interfaces.push(Interface {
                        linktype: intf.linktype,
                        snaplen: intf.snaplen,
                    });
                    None
                }
                // Block data is 32-bit aligned; only the captured bytes are a frame.
                PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(FrameEvent {
                    ts: Some(pcapng_ts_to_seconds(packet.ts_high, packet.ts_low)),
                    linktype: interface_for(interfaces, packet.if_id).linktype,
                    data: packet.packet_data().to_vec(),
                }),
                PcapBlockOwned::NG(Block::SimplePacket(packet)) => {
                    let interface = interface_for(interfaces, 0);
                    let len = simple_packet_len(packet.origlen, interface.snaplen);
                    Some(FrameEvent {
                        ts: None,
                        linktype: interface.linktype,
                        data: packet.data.get(..len).unwrap_or(packet.data).to_vec(),
                    })
                }
                _ => None,
            })
        }
    }
}

/// Pull blocks until `on_block` turns one into a frame or the file ends.
fn drain<R, F>(
    reader: &mut R,
    context: &'static str,
    mut on_block: F,
) -> Result<Option<FrameEvent>, PcapSourceError>
where
    R: PcapReaderIterator,
    F: FnMut(PcapBlockOwned<'_>) -> Option<FrameEvent>,
{
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = on_block(block);
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| PcapSourceError::pcap(context, e))?;
            }
            Err(e) => return Err(PcapSourceError::pcap(context, e)),
        }
    }
}
