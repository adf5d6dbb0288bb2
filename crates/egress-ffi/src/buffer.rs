//! Buffer lifecycle and query FFI: create, update, reset, destroy, reads.
//!
//! Uses per-buffer `Arc<Mutex<StateBuffer>>` so the global `BUFFERS` table
//! lock is only held briefly (for handle lookup). Queries and updates on
//! the same buffer serialize through its own mutex; distinct buffers never
//! contend with each other.
//!
//! The intended wiring is one simulation thread calling
//! [`egress_buffer_update`] once per tick while a render thread calls the
//! query functions once per frame. More writers are safe but will simply
//! interleave whole ticks.

use std::sync::{Arc, Mutex};

use egress_core::{AgentId, FrameAccess};
use egress_state::{BufferConfig, StateBuffer, StateUpdate};

use crate::handle::HandleTable;
use crate::status::EgressStatus;

type BufferArc = Arc<Mutex<StateBuffer>>;

static BUFFERS: Mutex<HandleTable<BufferArc>> = Mutex::new(HandleTable::new());

/// Shape and progress counters for a buffer, for host-side preflight
/// and debug overlays.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EgressBufferInfo {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// Number of agents in every update payload.
    pub agent_count: i32,
    /// Simulation time of the published tick (0.0 before any update).
    pub sim_time: f64,
    /// Number of updates applied since creation or the last reset.
    pub updates_applied: u64,
    /// Heap bytes held by the buffer's two state banks.
    pub memory_bytes: u64,
}

/// Clone the Arc for a buffer handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the mutex is poisoned.
fn get_buffer(handle: u64) -> Option<BufferArc> {
    BUFFERS.lock().ok()?.get(handle).cloned()
}

/// Create a visualization state buffer for a `width` x `height` cell
/// grid tracking `agent_count` agents.
///
/// On success, writes the buffer handle to `out` and returns `EGRESS_STATUS_OK`.
/// Dimensions must be positive and the agent count non-negative, or
/// `ConfigError` is returned and `out` is left unwritten.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_buffer_create(
    width: i32,
    height: i32,
    agent_count: i32,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }

        let config = BufferConfig::new(width, height, agent_count);
        let buffer = match StateBuffer::new(config) {
            Ok(b) => b,
            Err(e) => return EgressStatus::from(&e) as i32,
        };

        let handle = ffi_lock!(BUFFERS).insert(Arc::new(Mutex::new(buffer)));
        // SAFETY: out is valid per caller contract.
        unsafe { *out = handle };
        EgressStatus::Ok as i32
    })
}

/// Destroy a buffer, releasing its state banks.
///
/// The handle is invalidated; later calls with it return `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_buffer_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(BUFFERS).remove(handle) {
            Some(_) => EgressStatus::Ok as i32,
            None => EgressStatus::InvalidHandle as i32,
        }
    })
}

/// Reset a buffer to its freshly created state.
///
/// Time returns to 0.0, all agents to the origin and not evacuated, all
/// congestion to 0.0, and the update counter to zero. The handle stays
/// valid, so a host can restart a run without re-negotiating handles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_buffer_reset(handle: u64) -> i32 {
    ffi_guard!({
        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let mut buffer = ffi_lock!(buffer_arc);
        buffer.reset();
        EgressStatus::Ok as i32
    })
}

/// Publish one simulation tick.
///
/// `positions` holds `agent_count * 2` floats interleaved `x0, y0, x1,
/// y1, ...`; `evacuated` holds `agent_count` bytes (nonzero = evacuated);
/// `congestion` holds `width * height` floats in row-major order.
/// A pointer may be null only when its length is 0. Any length that does
/// not match the buffer's shape returns `SizeMismatch` and leaves the
/// published state untouched.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_buffer_update(
    handle: u64,
    time: f64,
    positions: *const f32,
    n_positions: usize,
    evacuated: *const u8,
    n_evacuated: usize,
    congestion: *const f32,
    n_congestion: usize,
) -> i32 {
    ffi_guard!({
        let positions = if n_positions > 0 {
            if positions.is_null() {
                return EgressStatus::InvalidArgument as i32;
            }
            // SAFETY: positions points to n_positions valid f32 values.
            unsafe { std::slice::from_raw_parts(positions, n_positions) }
        } else {
            &[]
        };
        let evacuated = if n_evacuated > 0 {
            if evacuated.is_null() {
                return EgressStatus::InvalidArgument as i32;
            }
            // SAFETY: evacuated points to n_evacuated valid bytes.
            unsafe { std::slice::from_raw_parts(evacuated, n_evacuated) }
        } else {
            &[]
        };
        let congestion = if n_congestion > 0 {
            if congestion.is_null() {
                return EgressStatus::InvalidArgument as i32;
            }
            // SAFETY: congestion points to n_congestion valid f32 values.
            unsafe { std::slice::from_raw_parts(congestion, n_congestion) }
        } else {
            &[]
        };

        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        // Per-buffer lock: only this buffer is locked, not the global table.
        let mut buffer = ffi_lock!(buffer_arc);

        let update = StateUpdate {
            time,
            positions,
            evacuated,
            congestion,
        };
        match buffer.apply(update) {
            Ok(_) => EgressStatus::Ok as i32,
            Err(e) => EgressStatus::from(&e) as i32,
        }
    })
}

/// Read one agent's published position and evacuation flag.
///
/// On success writes the coordinates to `x_out`/`y_out`, 1 or 0 to
/// `evacuated_out`, and returns `EGRESS_STATUS_OK`. A negative or out-of-range
/// `agent_id` returns `OutOfRange` with all three outputs unwritten, so
/// a renderer that keys draws off the status leaves that entity exactly
/// where its last valid read put it.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_agent_position(
    handle: u64,
    agent_id: i32,
    x_out: *mut f32,
    y_out: *mut f32,
    evacuated_out: *mut i32,
) -> i32 {
    ffi_guard!({
        if x_out.is_null() || y_out.is_null() || evacuated_out.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }

        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);

        if agent_id < 0 {
            return EgressStatus::OutOfRange as i32;
        }
        let agent = match buffer.frame().agent(AgentId(agent_id as u32)) {
            Some(a) => a,
            None => return EgressStatus::OutOfRange as i32,
        };

        // SAFETY: all three out pointers are valid per caller contract.
        unsafe {
            *x_out = agent.x;
            *y_out = agent.y;
            *evacuated_out = i32::from(agent.evacuated);
        }
        EgressStatus::Ok as i32
    })
}

/// Congestion at cell `(x, y)` of the published tick.
///
/// Out-of-bounds coordinates read as 0.0, so a renderer can sample past
/// the grid edge without branching.
///
/// **Ambiguity warning:** returns 0.0 for "empty cell", "out of bounds",
/// and "invalid handle" alike. Prefer [`egress_congestion_at_get`] for
/// unambiguous error detection.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_congestion_at(handle: u64, x: i32, y: i32) -> f32 {
    ffi_guard_or!(0.0, {
        get_buffer(handle)
            .and_then(|arc| arc.lock().ok().map(|b| b.frame().congestion_at(x, y)))
            .unwrap_or(0.0)
    })
}

/// Congestion at cell `(x, y)` with explicit error reporting.
///
/// Writes the value to `*out` and returns `EGRESS_STATUS_OK`. Out-of-bounds
/// coordinates return `OutOfRange`; a dead handle returns
/// `InvalidHandle`; neither writes to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_congestion_at_get(handle: u64, x: i32, y: i32, out: *mut f32) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);

        let frame = buffer.frame();
        let value = match frame.dims().index(x, y) {
            Some(i) => frame.congestion()[i],
            None => return EgressStatus::OutOfRange as i32,
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = value };
        EgressStatus::Ok as i32
    })
}

/// Copy the published congestion map into a caller-allocated buffer.
///
/// The map is `width * height` floats in row-major order. Returns
/// `BufferTooSmall` if `buf_len` is less than the cell count.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_congestion_read(handle: u64, buf: *mut f32, buf_len: usize) -> i32 {
    ffi_guard!({
        if buf.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);

        let frame = buffer.frame();
        let data = frame.congestion();
        if buf_len < data.len() {
            return EgressStatus::BufferTooSmall as i32;
        }
        // SAFETY: buf points to buf_len valid f32 values.
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), buf, data.len());
        }
        EgressStatus::Ok as i32
    })
}

/// Copy all published agent positions into a caller-allocated buffer.
///
/// Writes `agent_count * 2` floats interleaved `x0, y0, x1, y1, ...`,
/// matching the update payload layout. Returns `BufferTooSmall` if
/// `buf_len` is less than `agent_count * 2`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_positions_read(handle: u64, buf: *mut f32, buf_len: usize) -> i32 {
    ffi_guard!({
        if buf.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);

        let frame = buffer.frame();
        let agents = frame.agents();
        if buf_len < agents.len() * 2 {
            return EgressStatus::BufferTooSmall as i32;
        }
        for (i, agent) in agents.iter().enumerate() {
            // SAFETY: buf points to buf_len >= agents.len() * 2 valid f32s.
            unsafe {
                *buf.add(i * 2) = agent.x;
                *buf.add(i * 2 + 1) = agent.y;
            }
        }
        EgressStatus::Ok as i32
    })
}

/// Copy all published evacuation flags into a caller-allocated buffer.
///
/// Writes `agent_count` bytes, 1 for evacuated and 0 otherwise. Returns
/// `BufferTooSmall` if `buf_len` is less than the agent count.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_evacuated_read(handle: u64, buf: *mut u8, buf_len: usize) -> i32 {
    ffi_guard!({
        if buf.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);

        let frame = buffer.frame();
        let agents = frame.agents();
        if buf_len < agents.len() {
            return EgressStatus::BufferTooSmall as i32;
        }
        for (i, agent) in agents.iter().enumerate() {
            // SAFETY: buf points to buf_len >= agents.len() valid bytes.
            unsafe {
                *buf.add(i) = u8::from(agent.evacuated);
            }
        }
        EgressStatus::Ok as i32
    })
}

/// Simulation time of the published tick (0.0 before any update).
///
/// **Ambiguity warning:** returns 0.0 for both "time 0.0" and "invalid
/// handle." Prefer [`egress_sim_time_get`] for unambiguous error
/// detection.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_sim_time(handle: u64) -> f64 {
    ffi_guard_or!(0.0, {
        get_buffer(handle)
            .and_then(|arc| arc.lock().ok().map(|b| b.frame().time()))
            .unwrap_or(0.0)
    })
}

/// Simulation time with explicit error reporting.
///
/// Writes the time to `*out` and returns `EGRESS_STATUS_OK`. Returns
/// `InvalidHandle` or `InternalError` without writing to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_sim_time_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);
        // SAFETY: out is valid per caller contract.
        unsafe { *out = buffer.frame().time() };
        EgressStatus::Ok as i32
    })
}

/// Number of updates applied since creation or the last reset.
///
/// **Ambiguity warning:** returns 0 for both "no updates yet" and
/// "invalid handle." Prefer [`egress_update_count_get`] for unambiguous
/// error detection.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_update_count(handle: u64) -> u64 {
    ffi_guard_or!(0, {
        get_buffer(handle)
            .and_then(|arc| arc.lock().ok().map(|b| b.generation().0))
            .unwrap_or(0)
    })
}

/// Update count with explicit error reporting.
///
/// Writes the count to `*out` and returns `EGRESS_STATUS_OK`. Returns
/// `InvalidHandle` or `InternalError` without writing to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_update_count_get(handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);
        // SAFETY: out is valid per caller contract.
        unsafe { *out = buffer.generation().0 };
        EgressStatus::Ok as i32
    })
}

/// Shape and progress counters for a buffer.
///
/// Writes an [`EgressBufferInfo`] to `*out` and returns `EGRESS_STATUS_OK`.
/// Returns `InvalidHandle` or `InternalError` without writing to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn egress_buffer_info_get(handle: u64, out: *mut EgressBufferInfo) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return EgressStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(handle) {
            Some(arc) => arc,
            None => return EgressStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);

        let dims = buffer.dims();
        let info = EgressBufferInfo {
            width: dims.width.min(i32::MAX as u32) as i32,
            height: dims.height.min(i32::MAX as u32) as i32,
            agent_count: buffer.agent_count().min(i32::MAX as usize) as i32,
            sim_time: buffer.frame().time(),
            updates_applied: buffer.generation().0,
            memory_bytes: buffer.memory_bytes() as u64,
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = info };
        EgressStatus::Ok as i32
    })
}
