//! Escrow timelocks.

use crate::error::TimelocksError;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Bit offset of the deployment timestamp in the packed timelocks word.
const DEPLOYED_AT_OFFSET: usize = 224;

/// Width of every field in the packed timelocks word.
const FIELD_BITS: usize = 32;

/// A named deadline on the timeline of a swap.
///
/// Source stages apply to the escrow on the maker's chain, destination stages to the escrow on the
/// resolver's chain. The discriminant is the index of the stage's field in the packed word.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[repr(u8)]
pub enum Stage {
    /// The taker may withdraw from the source escrow.
    SrcWithdrawal = 0,
    /// Anyone may withdraw from the source escrow on behalf of the taker.
    SrcPublicWithdrawal = 1,
    /// The maker may cancel the source escrow.
    SrcCancellation = 2,
    /// Anyone may cancel the source escrow.
    SrcPublicCancellation = 3,
    /// The taker may withdraw from the destination escrow to the maker.
    DstWithdrawal = 4,
    /// Anyone may withdraw from the destination escrow to the maker.
    DstPublicWithdrawal = 5,
    /// The taker may cancel the destination escrow.
    DstCancellation = 6,
}

impl Stage {
    /// All stages in packing order.
    pub const ALL: [Self; 7] = [
        Self::SrcWithdrawal,
        Self::SrcPublicWithdrawal,
        Self::SrcCancellation,
        Self::SrcPublicCancellation,
        Self::DstWithdrawal,
        Self::DstPublicWithdrawal,
        Self::DstCancellation,
    ];

    /// Pairs of stages that must be ordered on the timeline.
    const ORDERING: [(Self, Self); 5] = [
        (Self::SrcWithdrawal, Self::SrcPublicWithdrawal),
        (Self::SrcPublicWithdrawal, Self::SrcCancellation),
        (Self::SrcCancellation, Self::SrcPublicCancellation),
        (Self::DstWithdrawal, Self::DstPublicWithdrawal),
        (Self::DstPublicWithdrawal, Self::DstCancellation),
    ];

    const fn bit_offset(self) -> usize {
        self as usize * FIELD_BITS
    }
}

/// Stage offsets of one swap plus the timestamp they are relative to.
///
/// Offsets are seconds after [`Timelocks::deployed_at`]. The deployment timestamp is zero until the
/// factory creates the escrow, and stage deadlines cannot be read before that.
///
/// # Packed layout
///
/// Escrows hash the timelocks as one 256-bit word:
///
/// ```text
///      ,--------------------------------------------------------------.
/// bits | 224-255     | 192-223 | 160-191 | ... | 32-63       | 0-31    |
///      |-------------|---------|---------|-----|-------------|---------|
/// desc | deployed at | stage 6 | stage 5 | ... | stage 1     | stage 0 |
///      `--------------------------------------------------------------'
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timelocks {
    /// Deployment timestamp of the escrow, zero until set.
    #[serde(default)]
    pub deployed_at: u32,
    /// Offset of [`Stage::SrcWithdrawal`].
    pub src_withdrawal: u32,
    /// Offset of [`Stage::SrcPublicWithdrawal`].
    pub src_public_withdrawal: u32,
    /// Offset of [`Stage::SrcCancellation`].
    pub src_cancellation: u32,
    /// Offset of [`Stage::SrcPublicCancellation`].
    pub src_public_cancellation: u32,
    /// Offset of [`Stage::DstWithdrawal`].
    pub dst_withdrawal: u32,
    /// Offset of [`Stage::DstPublicWithdrawal`].
    pub dst_public_withdrawal: u32,
    /// Offset of [`Stage::DstCancellation`].
    pub dst_cancellation: u32,
}

impl Timelocks {
    /// Returns the offset of `stage` relative to the deployment timestamp.
    pub const fn offset(&self, stage: Stage) -> u32 {
        match stage {
            Stage::SrcWithdrawal => self.src_withdrawal,
            Stage::SrcPublicWithdrawal => self.src_public_withdrawal,
            Stage::SrcCancellation => self.src_cancellation,
            Stage::SrcPublicCancellation => self.src_public_cancellation,
            Stage::DstWithdrawal => self.dst_withdrawal,
            Stage::DstPublicWithdrawal => self.dst_public_withdrawal,
            Stage::DstCancellation => self.dst_cancellation,
        }
    }

    fn offset_mut(&mut self, stage: Stage) -> &mut u32 {
        match stage {
            Stage::SrcWithdrawal => &mut self.src_withdrawal,
            Stage::SrcPublicWithdrawal => &mut self.src_public_withdrawal,
            Stage::SrcCancellation => &mut self.src_cancellation,
            Stage::SrcPublicCancellation => &mut self.src_public_cancellation,
            Stage::DstWithdrawal => &mut self.dst_withdrawal,
            Stage::DstPublicWithdrawal => &mut self.dst_public_withdrawal,
            Stage::DstCancellation => &mut self.dst_cancellation,
        }
    }

    /// Whether the deployment timestamp has been set.
    pub const fn is_deployed(&self) -> bool {
        self.deployed_at != 0
    }

    /// Returns the absolute deadline of `stage`.
    pub fn get(&self, stage: Stage) -> Result<u64, TimelocksError> {
        if !self.is_deployed() {
            return Err(TimelocksError::NotDeployed);
        }
        Ok(u64::from(self.deployed_at) + u64::from(self.offset(stage)))
    }

    /// Returns the timestamp from which residual funds can be rescued.
    pub fn rescue_start(&self, rescue_delay: u64) -> Result<u64, TimelocksError> {
        if !self.is_deployed() {
            return Err(TimelocksError::NotDeployed);
        }
        Ok(u64::from(self.deployed_at).saturating_add(rescue_delay))
    }

    /// Returns a copy with the deployment timestamp set to `deployed_at`.
    pub const fn with_deployed_at(mut self, deployed_at: u32) -> Self {
        self.deployed_at = deployed_at;
        self
    }

    /// Returns a copy deployed at the block timestamp `timestamp`.
    ///
    /// Zero is rejected since it marks timelocks that are not deployed yet.
    pub fn deployed_at_timestamp(self, timestamp: u64) -> Result<Self, TimelocksError> {
        if timestamp == 0 {
            return Err(TimelocksError::ZeroTimestamp);
        }
        let deployed_at =
            u32::try_from(timestamp).map_err(|_| TimelocksError::TimestampOverflow(timestamp))?;
        Ok(self.with_deployed_at(deployed_at))
    }

    /// Checks that the stages of each leg are in timeline order.
    pub fn validate(&self) -> Result<(), TimelocksError> {
        for (earlier, later) in Stage::ORDERING {
            if self.offset(earlier) > self.offset(later) {
                return Err(TimelocksError::NonMonotonic { earlier, later });
            }
        }
        Ok(())
    }

    /// Packs the timelocks into a single word.
    pub fn pack(&self) -> U256 {
        Stage::ALL.into_iter().fold(
            U256::from(self.deployed_at) << DEPLOYED_AT_OFFSET,
            |word, stage| word | (U256::from(self.offset(stage)) << stage.bit_offset()),
        )
    }

    /// Unpacks timelocks from a packed word.
    pub fn from_packed(word: U256) -> Self {
        let field = |offset: usize| (word >> offset).wrapping_to::<u32>();
        let mut timelocks = Self::default().with_deployed_at(field(DEPLOYED_AT_OFFSET));
        for stage in Stage::ALL {
            *timelocks.offset_mut(stage) = field(stage.bit_offset());
        }
        timelocks
    }
}

impl From<Timelocks> for U256 {
    fn from(timelocks: Timelocks) -> Self {
        timelocks.pack()
    }
}

impl From<U256> for Timelocks {
    fn from(word: U256) -> Self {
        Self::from_packed(word)
    }
}
