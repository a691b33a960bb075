//! In-process simulated platform.
//!
//! Every PE other than the home PE is backed by a worker thread fed
//! through a channel. Quirked PEs misbehave in controlled ways: a mute
//! PE discards work without running it, a slow PE sleeps before
//! running it, a faulty PE fails its firmware self-test.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::pe::board::StatusBoard;

use super::pfdi::{self, PfdiRequest, PfdiReturn, function};
use super::profile::{PeQuirk, PlatformProfile};
use super::{PeJob, Platform, PlatformError, PlatformKind};

/// How long a slow PE sits on a job before running it.
pub const SLOW_PE_DELAY: Duration = Duration::from_millis(20);

/// Index of the PE the engine runs on.
const HOME_PE: u32 = 0;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("platform description declares no PEs")]
    NoPes,
    #[error("failed to start PE worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

pub struct SimPlatform {
    profile: PlatformProfile,
    board: StatusBoard,
    lanes: Vec<Option<Lane>>,
}

struct Lane {
    sender: Sender<PeJob>,
    worker: JoinHandle<()>,
}

impl SimPlatform {
    pub fn new(profile: PlatformProfile) -> Result<Self, ProfileError> {
        if profile.pes.is_empty() {
            return Err(ProfileError::NoPes);
        }

        let pe_count = profile.pe_count();
        let mut lanes = Vec::with_capacity(pe_count as usize);
        for pe in 0..pe_count {
            if pe == HOME_PE {
                lanes.push(None);
            } else {
                lanes.push(Some(spawn_lane(pe, profile.quirk(pe))?));
            }
        }

        Ok(Self {
            profile,
            board: StatusBoard::new(pe_count),
            lanes,
        })
    }
}

fn spawn_lane(pe: u32, quirk: PeQuirk) -> Result<Lane, std::io::Error> {
    let (sender, receiver) = mpsc::channel::<PeJob>();
    let worker = thread::Builder::new()
        .name(format!("pe{pe}"))
        .spawn(move || {
            for job in receiver {
                match quirk {
                    PeQuirk::Mute => {
                        debug!(pe, "mute PE discarding job");
                        drop(job);
                    }
                    PeQuirk::Slow => {
                        thread::sleep(SLOW_PE_DELAY);
                        job();
                    }
                    PeQuirk::Normal | PeQuirk::Faulty => job(),
                }
            }
        })?;

    Ok(Lane { sender, worker })
}

impl Platform for SimPlatform {
    fn kind(&self) -> PlatformKind {
        self.profile.kind
    }

    fn pe_count(&self) -> u32 {
        self.profile.pe_count()
    }

    fn current_pe(&self) -> u32 {
        HOME_PE
    }

    fn execute_on_pe(&self, pe: u32, job: PeJob) -> Result<(), PlatformError> {
        let count = self.pe_count();
        if pe >= count {
            return Err(PlatformError::InvalidPe { pe, count });
        }
        if pe == self.current_pe() {
            return Err(PlatformError::SelfDispatch { pe });
        }

        let lane = self.lanes[pe as usize]
            .as_ref()
            .ok_or(PlatformError::Unavailable { pe })?;
        lane.sender
            .send(job)
            .map_err(|_| PlatformError::Unavailable { pe })
    }

    fn board(&self) -> &StatusBoard {
        &self.board
    }

    fn pfdi_call(&self, pe: u32, request: PfdiRequest) -> PfdiReturn {
        let block = &self.profile.pfdi;
        if !block.functions.contains(&request.function) {
            return PfdiReturn::error(pfdi::NOT_SUPPORTED);
        }

        let faulty = pe < self.pe_count() && self.profile.quirk(pe) == PeQuirk::Faulty;
        match request.function {
            function::VERSION => PfdiReturn {
                x0: pfdi::SUCCESS,
                x1: pfdi::pack_version(block.version_major, block.version_minor),
                x2: block.reserved,
                x3: 0,
            },
            function::FEATURES => {
                let probed = request.arg0 as u32;
                if block.functions.contains(&probed) {
                    PfdiReturn::success()
                } else {
                    PfdiReturn::error(pfdi::NOT_SUPPORTED)
                }
            }
            function::PE_TEST_ID => PfdiReturn {
                x0: pfdi::SUCCESS,
                x1: block.test_id as u64,
                x2: block.reserved,
                x3: 0,
            },
            function::PE_TEST_PART_COUNT => PfdiReturn {
                x0: pfdi::SUCCESS,
                x1: block.part_count as u64,
                x2: 0,
                x3: 0,
            },
            function::PE_TEST_RUN => {
                if faulty {
                    PfdiReturn::error(pfdi::TEST_FAILED)
                } else {
                    PfdiReturn::success()
                }
            }
            function::PE_TEST_RESULT => {
                if faulty {
                    PfdiReturn {
                        x0: pfdi::TEST_FAILED,
                        x1: 1,
                        x2: 0,
                        x3: 0,
                    }
                } else {
                    PfdiReturn::success()
                }
            }
            function::FW_CHECK => PfdiReturn::success(),
            function::FORCE_ERROR => PfdiReturn {
                x0: pfdi::SUCCESS,
                x1: request.arg0,
                x2: 0,
                x3: 0,
            },
            _ => PfdiReturn::error(pfdi::NOT_SUPPORTED),
        }
    }

    fn description(&self) -> &PlatformProfile {
        &self.profile
    }
}

impl Drop for SimPlatform {
    fn drop(&mut self) {
        for lane in self.lanes.drain(..).flatten() {
            drop(lane.sender);
            let _ = lane.worker.join();
        }
    }
}
