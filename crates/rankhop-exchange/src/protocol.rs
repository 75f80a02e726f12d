//! The four-phase count/payload exchange with face neighbors.
//!
//! Per pass, for every face shared with another rank:
//!
//! 1. post the record count (first [`COUNT_BYTES`] of the envelope) to
//!    the peer, then post the matching count receives;
//! 2. await all count receives, then all count sends;
//! 3. post the full envelopes, size the receive ports from the counts
//!    just received, and post the payload receives;
//! 4. await each payload receive and hand its records to the caller,
//!    then await all payload sends.
//!
//! Outbound face `k` sends with tag `k`. The neighbor across port `p`
//! sent through its face `p.opposite()`, so port `p` receives tag
//! `p.opposite()`. All sends of a phase are posted before any receive
//! of that phase is awaited.

use crate::error::{ExchangeError, TransportContext};
use rankhop_comm::wire::{envelope_len, read_count, EnvelopeReader, EnvelopeWriter, COUNT_BYTES};
use rankhop_comm::Transport;
use rankhop_core::{Face, InjectorRecord};
use smallvec::SmallVec;

/// Faces shared with other ranks, with the peer across each.
pub type RemoteFaces = SmallVec<[(Face, usize); 6]>;

/// Grow every outbound send buffer to hold `nm` records.
///
/// Sized once per pass for the worst case of all movers leaving through
/// one face.
pub fn size_send_buffers(
    transport: &mut dyn Transport,
    faces: &RemoteFaces,
    nm: usize,
    pass: usize,
) -> Result<(), ExchangeError> {
    for &(face, _) in faces {
        transport
            .size_send_buffer(face, envelope_len(nm))
            .at(pass, face)?;
    }
    Ok(())
}

/// Phases 1 and 2: write every outbound envelope and trade record counts.
pub fn exchange_counts(
    transport: &mut dyn Transport,
    faces: &RemoteFaces,
    outbound: &[Vec<InjectorRecord>; 6],
    pass: usize,
) -> Result<(), ExchangeError> {
    for &(face, peer) in faces {
        let mut writer = EnvelopeWriter::new(transport.send_buffer(face)).at(pass, face)?;
        for record in &outbound[face.index()] {
            writer.push(record).at(pass, face)?;
        }
        writer.finish();
        transport
            .begin_send(face, COUNT_BYTES, peer, face)
            .at(pass, face)?;
    }
    for &(port, src) in faces {
        transport
            .size_recv_buffer(port, COUNT_BYTES)
            .at(pass, port)?;
        transport
            .begin_recv(port, COUNT_BYTES, src, port.opposite())
            .at(pass, port)?;
    }
    for &(port, _) in faces {
        transport.end_recv(port).at(pass, port)?;
    }
    for &(face, _) in faces {
        transport.end_send(face).at(pass, face)?;
    }
    Ok(())
}

/// Phases 3 and 4: ship envelopes and feed arrivals to `arrive`.
///
/// `arrive` sees each port's records once that port's receive completes.
pub fn exchange_payloads<F>(
    transport: &mut dyn Transport,
    faces: &RemoteFaces,
    outbound: &[Vec<InjectorRecord>; 6],
    pass: usize,
    mut arrive: F,
) -> Result<(), ExchangeError>
where
    F: FnMut(Face, EnvelopeReader<'_>) -> Result<(), ExchangeError>,
{
    for &(face, peer) in faces {
        let len = envelope_len(outbound[face.index()].len());
        transport.begin_send(face, len, peer, face).at(pass, face)?;
    }
    let mut posted: SmallVec<[(Face, usize); 6]> = SmallVec::new();
    for &(port, src) in faces {
        let count = read_count(transport.recv_buffer(port)).at(pass, port)?;
        let len = envelope_len(count as usize);
        transport.size_recv_buffer(port, len).at(pass, port)?;
        transport
            .begin_recv(port, len, src, port.opposite())
            .at(pass, port)?;
        posted.push((port, len));
    }
    for &(port, len) in &posted {
        transport.end_recv(port).at(pass, port)?;
        let reader = EnvelopeReader::new(&transport.recv_buffer(port)[..len]).at(pass, port)?;
        arrive(port, reader)?;
    }
    for &(face, _) in faces {
        transport.end_send(face).at(pass, face)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankhop_comm::ChannelMesh;
    use std::thread;

    fn record(cell: i32) -> InjectorRecord {
        InjectorRecord {
            cell,
            weight: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn two_ranks_swap_envelopes_across_both_x_faces() {
        // Periodic pair: each rank sees the other across -x and +x.
        let faces: RemoteFaces = [(Face::NegX, 0usize), (Face::PosX, 0usize)]
            .into_iter()
            .collect();
        let handles: Vec<_> = ChannelMesh::build(2, 1 << 16)
            .into_iter()
            .map(|mut t| {
                let mut faces = faces.clone();
                for f in faces.iter_mut() {
                    f.1 = 1 - t.rank();
                }
                thread::spawn(move || {
                    let rank = t.rank() as i32;
                    let mut outbound: [Vec<InjectorRecord>; 6] = Default::default();
                    outbound[Face::PosX.index()] = vec![record(10 * rank + 1)];
                    outbound[Face::NegX.index()] = vec![record(10 * rank + 2), record(10 * rank + 3)];

                    size_send_buffers(&mut t, &faces, 2, 0).unwrap();
                    exchange_counts(&mut t, &faces, &outbound, 0).unwrap();
                    let mut got: Vec<(Face, i32)> = Vec::new();
                    exchange_payloads(&mut t, &faces, &outbound, 0, |port, reader| {
                        got.extend(reader.map(|r| (port, r.cell)));
                        Ok(())
                    })
                    .unwrap();
                    got
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (rank, got) in results.iter().enumerate() {
            let other = 10 * (1 - rank as i32);
            // What the peer sent through +x arrives on -x, and vice versa.
            assert_eq!(
                got,
                &vec![
                    (Face::NegX, other + 1),
                    (Face::PosX, other + 2),
                    (Face::PosX, other + 3)
                ]
            );
        }
    }

    #[test]
    fn undersized_send_buffer_is_fatal() {
        let mut mesh = ChannelMesh::build(2, 8);
        let faces: RemoteFaces = [(Face::PosX, 1usize)].into_iter().collect();
        match size_send_buffers(&mut mesh[0], &faces, 1, 3) {
            Err(ExchangeError::Transport {
                pass: 3,
                face: Face::PosX,
                ..
            }) => {}
            other => panic!("expected Transport error, got {other:?}"),
        }
    }
}
