//! Sample upload to sound RAM over DMA channel 4
//!
//! # Protocol
//!
//! 1. Point the SPU transfer address at the destination (8-byte units).
//! 2. Switch the SPU into DMA-write mode and wait for the mode to latch.
//! 3. Clear the bus device 4 bits that interfere with the transfer.
//! 4. Program the channel: source address, block count/size, start.
//! 5. Wait for the channel's busy bit to clear.
//!
//! The channel moves 64-byte blocks, so a trailing partial block is
//! transferred in full.
//!
//! Uploads are not reentrant and must not overlap key-on/key-off, which
//! share the SPU control register. Holding `&mut Spu` enforces both.

use crate::error::{SpuError, SpuResult};
use crate::regs::{self, ChannelControl, Registers, SpuControl};
use crate::spu::Spu;
use crate::wait::Wait;

/// Bytes per DMA block
pub const BLOCK_SIZE: usize = 64;

/// 32-bit words per DMA block
pub const BLOCK_WORDS: u32 = (BLOCK_SIZE / 4) as u32;

/// Number of 64-byte blocks needed for `size` bytes
#[inline]
pub const fn block_count(size: usize) -> u32 {
    size.div_ceil(BLOCK_SIZE) as u32
}

/// BCR word: block count in the high half, words per block in the low half
#[inline]
pub const fn bcr_word(size: usize) -> u32 {
    (block_count(size) << 16) | BLOCK_WORDS
}

/// Location of an uploaded sample in sound RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBank {
    /// Byte address in sound RAM
    pub address: u32,
    /// Size in bytes
    pub size: u32,
}

impl SampleBank {
    /// First byte after the sample
    #[inline]
    pub const fn end(&self) -> u32 {
        self.address + self.size
    }

    /// Next ADPCM-block aligned address after the sample
    #[inline]
    pub const fn next_free(&self) -> u32 {
        (self.end() + 15) & !15
    }
}

impl<B: Registers, W: Wait> Spu<B, W> {
    /// Copy `data` to sound RAM at `address`
    ///
    /// Blocks until the DMA channel reports completion.
    pub fn upload(&mut self, address: u32, data: &[u8]) -> SpuResult<SampleBank> {
        let end = (address as usize).checked_add(data.len());
        if end.is_none_or(|end| end > regs::SOUND_RAM_SIZE as usize) {
            return Err(SpuError::OutOfSoundMemory {
                address,
                size: data.len(),
            });
        }

        let bcr = bcr_word(data.len());
        log::debug!(
            "uploading {} bytes to {address:#07X} ({} blocks)",
            data.len(),
            block_count(data.len())
        );

        let bus = &mut self.bus;
        bus.write16(regs::RAM_TRANSFER_ADDR, (address >> 3) as u16);
        bus.modify16(regs::CTRL, |ctrl| {
            (ctrl & !SpuControl::TRANSFER_MODE.bits()) | SpuControl::DMA_WRITE.bits()
        });
        self.wait.wait_until("DMA write mode", 0, || {
            bus.read16(regs::CTRL) & SpuControl::TRANSFER_MODE.bits()
                == SpuControl::DMA_WRITE.bits()
        })?;

        bus.modify32(regs::SBUS_DEV4_CTRL, |ctrl| ctrl & !regs::SBUS_DEV4_CLEAR_MASK);
        bus.write32(regs::DMA_SPU_MADR, data.as_ptr() as usize as u32);
        bus.write32(regs::DMA_SPU_BCR, bcr);
        bus.write32(regs::DMA_SPU_CHCR, ChannelControl::SPU_WRITE.bits());

        self.wait.wait_until("DMA completion", 0, || {
            bus.read32(regs::DMA_SPU_CHCR) & ChannelControl::START_BUSY.bits() == 0
        })?;

        Ok(SampleBank {
            address,
            size: data.len() as u32,
        })
    }
}
