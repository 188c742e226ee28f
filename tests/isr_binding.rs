use lazy_static::lazy_static;
use serial_ring::bsp::Scon;
use serial_ring::typenum::U8;
use serial_ring::{InterruptDispatcher, IsrBinding, SerialError, SerialHardware, Status, Uart};

static SCON1: Scon = Scon::new();
static BINDING: IsrBinding<InterruptDispatcher<'static, U8, Scon>> = IsrBinding::new();

lazy_static! {
    static ref UART1: Uart<U8> = Uart::new();
    static ref UART2: Uart<U8> = Uart::new();
}

serial_ring::uart_interrupt!(UART1_ISR, BINDING);

#[test]
fn static_driver_through_interrupt_vector() {
    // nothing bound yet: the handler is a no-op
    UART1_ISR();
    assert!(!BINDING.is_bound());

    let (mut port, irq) = UART1.split(&SCON1).unwrap();
    assert_eq!(UART1.split(&SCON1).err(), Some(SerialError::AlreadySplit));
    BINDING.install(irq).unwrap();

    port.enqueue(b'O').unwrap();
    port.enqueue(b'K').unwrap();
    assert!(SCON1.status().get_tx_ready());

    UART1_ISR();
    assert_eq!(SCON1.sbuf(), b'O');
    assert!(!SCON1.status().get_tx_ready());

    // the peripheral signals each completed byte
    SCON1.raise(Status::TX_READY);
    UART1_ISR();
    assert_eq!(SCON1.sbuf(), b'K');
    assert!(!port.is_idle());

    SCON1.raise(Status::TX_READY);
    UART1_ISR();
    assert!(port.is_idle());
    assert_eq!(SCON1.scon(), 0);

    SCON1.write_data(0x7F);
    SCON1.raise(Status::RX_READY);
    UART1_ISR();
    assert_eq!(port.dequeue(), Some(0x7F));
    assert_eq!(port.dequeue(), None);
    assert_eq!(SCON1.scon(), 0);

    // a second dispatcher cannot replace the bound one
    let (_port2, irq2) = UART2.split(&SCON1).unwrap();
    assert_eq!(BINDING.install(irq2), Err(SerialError::AlreadyBound));

    assert!(BINDING.take().is_some());
    assert!(!BINDING.is_bound());
}
